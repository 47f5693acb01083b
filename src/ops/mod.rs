//! User-level operations over a workspace.
//!
//! Each operation discovers the workspace, builds a fresh [`Registry`], and
//! works on that snapshot. Mutating operations commit through one
//! [`ChangeSet`] and then notify the hooks of every rewritten location.

pub mod add;
pub mod check;
pub mod get;
pub mod remove;
pub mod set;

use std::path::{Path, PathBuf};

pub use add::{add, AddRequest, Added};
pub use check::check;
pub use get::{get, version_of, VersionInfo};
pub use remove::{remove, Removed};
pub use set::{bump, set, ReleaseType, VersionSet};

use crate::changes::ChangeSet;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::hooks::{run_hooks, HookEvent};
use crate::manifest::{Manifest, ManifestStore};
use crate::registry::Registry;
use crate::workspace::discover;

/// Discovers the workspace and loads every manifest.
pub(crate) async fn load_registry(ctx: &ServiceContext, config: &Config) -> Result<Registry> {
    let locations = discover(ctx, config).await?;
    Registry::build(ManifestStore::new(ctx.fs.as_ref()), &locations).await
}

/// The package an edit targets: the named workspace package, or the root.
pub(crate) fn target_package<'r>(
    registry: &'r Registry,
    root: &Path,
    parent: Option<&str>,
) -> Result<(&'r Path, &'r Manifest)> {
    match parent {
        Some(name) => registry
            .iter()
            .find(|(_, manifest)| manifest.name == name)
            .ok_or_else(|| Error::missing(name)),
        None => registry
            .iter()
            .find(|(location, _)| *location == root)
            .ok_or_else(|| Error::missing(root.display().to_string())),
    }
}

/// Commits `changes` and runs the hooks of the rewritten locations.
pub(crate) async fn commit_and_notify(
    ctx: &ServiceContext,
    mut changes: ChangeSet<'_>,
    event: &HookEvent,
) -> Result<Vec<PathBuf>> {
    let affected = changes.commit().await?;
    run_hooks(ctx, event, &affected).await?;
    Ok(affected)
}
