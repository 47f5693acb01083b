//! Change hooks: per-package executables notified after a commit.
//!
//! A manifest opts in with `"config": { "hook": "./scripts/on-change" }`. The
//! hook runs with its package directory as working directory and receives
//! the event as JSON on standard input.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::manifest::{DependencyKind, ManifestStore};
use crate::ports::shell::ShellCommand;

/// What happened to the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum HookEvent {
    /// A dependency was declared.
    Add {
        /// Dependency name.
        name: String,
        /// Declared version.
        version: String,
        /// Table it was added to.
        kind: DependencyKind,
        /// Package that declares it.
        parent: String,
    },
    /// A dependency was removed.
    Remove {
        /// Dependency name.
        name: String,
        /// Package it was removed from.
        parent: String,
    },
    /// A package moved to a new version everywhere.
    Version {
        /// Package name.
        name: String,
        /// New version.
        version: String,
    },
}

/// Runs the hook of every location that declares one, concurrently.
///
/// Locations without a hook are skipped. Every hook runs to completion
/// before the first failure is reported.
///
/// # Errors
///
/// Returns [`Error::Hook`] if a hook cannot be started or exits non-zero,
/// and manifest errors if a location can no longer be read.
pub async fn run_hooks(
    ctx: &ServiceContext,
    event: &HookEvent,
    locations: &[PathBuf],
) -> Result<()> {
    let results = join_all(locations.iter().map(|location| run_one(ctx, location, event))).await;
    results.into_iter().collect()
}

async fn run_one(ctx: &ServiceContext, location: &Path, event: &HookEvent) -> Result<()> {
    let manifest = ManifestStore::new(ctx.fs.as_ref()).load(location).await?;
    let Some(hook) = manifest.hook() else {
        return Ok(());
    };
    let failed = |message: String| Error::Hook { location: location.to_path_buf(), message };

    let payload = serde_json::to_string(event).map_err(|e| failed(e.to_string()))?;
    let program = location.join(hook);
    tracing::info!(location = %location.display(), hook, "running change hook");
    let command = ShellCommand::new(program.to_string_lossy(), location).stdin(payload);
    let output = ctx
        .shell
        .run(&command)
        .await
        .map_err(|e| failed(format!("failed to start {}: {e}", program.display())))?;

    if output.success() {
        Ok(())
    } else {
        Err(failed(format!("exited with code {}: {}", output.exit_code, output.stderr.trim())))
    }
}
