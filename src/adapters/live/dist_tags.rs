//! Live adapter for the `DistTagClient` port using the npm registry HTTP API.

use reqwest::Client;
use serde::Deserialize;

use crate::error::PortError;
use crate::ports::dist_tags::{DistTagClient, DistTagFuture};

/// Default public registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Live client that asks the package registry for the version behind a tag.
pub struct LiveDistTagClient {
    client: Client,
    base_url: String,
}

impl LiveDistTagClient {
    /// Creates a client talking to the registry at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    fn url_for(&self, name: &str, tag: &str) -> String {
        // Scoped names keep their `@` but the separator must be escaped.
        format!("{}/{}/{tag}", self.base_url, name.replace('/', "%2F"))
    }
}

impl Default for LiveDistTagClient {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

/// The subset of a registry version document we read.
#[derive(Deserialize)]
struct VersionDocument {
    version: String,
}

/// Error body returned by the registry.
#[derive(Deserialize)]
struct RegistryError {
    error: String,
}

impl LiveDistTagClient {
    async fn fetch(&self, name: &str, tag: &str) -> Result<String, PortError> {
        let url = self.url_for(name, tag);
        tracing::debug!(%url, "fetching dist-tag");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| -> PortError { format!("registry request failed: {e}").into() })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| -> PortError { format!("failed to read registry response: {e}").into() })?;

        if !status.is_success() {
            let msg =
                serde_json::from_str::<RegistryError>(&body).map(|e| e.error).unwrap_or(body);
            return Err(format!("registry error ({}): {msg}", status.as_u16()).into());
        }

        let document: VersionDocument = serde_json::from_str(&body).map_err(|e| -> PortError {
            format!("failed to parse registry response: {e}").into()
        })?;

        Ok(document.version)
    }
}

impl DistTagClient for LiveDistTagClient {
    fn version_for_tag<'a>(&'a self, name: &'a str, tag: &'a str) -> DistTagFuture<'a> {
        Box::pin(self.fetch(name, tag))
    }
}
