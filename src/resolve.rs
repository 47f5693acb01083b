//! Turns a user-supplied version or dist-tag into a concrete version.

use crate::error::{Error, Result};
use crate::ports::dist_tags::DistTagClient;
use crate::registry::Registry;

/// The only tag accepted for workspace packages.
pub const LATEST: &str = "latest";

/// Returns `true` when `version_or_tag` is a dist-tag rather than a version.
///
/// Anything without a dot (`latest`, `next`, `beta`) is a tag.
#[must_use]
pub fn is_tag(version_or_tag: &str) -> bool {
    !version_or_tag.contains('.')
}

/// Resolves `version_or_tag` for `name`.
///
/// Workspace packages always resolve to their own manifest version and accept
/// no tag other than `latest`. External versions are returned unchanged
/// without touching the registry; external tags are looked up.
///
/// # Errors
///
/// Returns [`Error::TagOnLocalPackage`] for a non-`latest` tag on a workspace
/// package and [`Error::Registry`] when the tag lookup fails.
pub async fn resolve_version(
    name: &str,
    version_or_tag: &str,
    registry: &Registry,
    dist_tags: &dyn DistTagClient,
) -> Result<String> {
    if let Some(manifest) = registry.lookup_local(name) {
        if is_tag(version_or_tag) && version_or_tag != LATEST {
            return Err(Error::TagOnLocalPackage {
                name: name.to_string(),
                tag: version_or_tag.to_string(),
            });
        }
        return Ok(manifest.version.clone());
    }

    if !is_tag(version_or_tag) {
        return Ok(version_or_tag.to_string());
    }

    tracing::debug!(name, tag = version_or_tag, "looking up dist-tag");
    let version =
        dist_tags.version_for_tag(name, version_or_tag).await.map_err(|e| Error::Registry {
            name: name.to_string(),
            tag: version_or_tag.to_string(),
            message: e.to_string(),
        })?;
    tracing::info!(name, tag = version_or_tag, %version, "resolved dist-tag");
    Ok(version)
}
