//! Dist-tag lookup port against an external package registry.

use std::future::Future;
use std::pin::Pin;

use crate::error::PortError;

/// Boxed future type alias used by [`DistTagClient`] to keep the trait dyn-compatible.
pub type DistTagFuture<'a> = Pin<Box<dyn Future<Output = Result<String, PortError>> + Send + 'a>>;

/// Resolves dist-tags (e.g. `latest`, `next`) to concrete published versions.
pub trait DistTagClient: Send + Sync {
    /// Returns the version currently published under `tag` for `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or tag is unknown, or the request fails.
    fn version_for_tag<'a>(&'a self, name: &'a str, tag: &'a str) -> DistTagFuture<'a>;
}
