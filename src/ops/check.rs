//! Workspace-wide integrity check.

use super::load_registry;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::integrity::{self, IntegrityReport};

/// Checks `name`, or every name when `None`.
///
/// Drift is part of the report, not an error; see
/// [`IntegrityReport::ensure_healthy`].
///
/// # Errors
///
/// Returns [`crate::Error::MissingPackage`] for an unknown `name`, and
/// discovery, manifest, or graph errors unchanged.
pub async fn check(
    ctx: &ServiceContext,
    config: &Config,
    name: Option<&str>,
) -> Result<IntegrityReport> {
    let registry = load_registry(ctx, config).await?;
    let graph = DependencyGraph::build(&registry)?;
    integrity::check(name, &graph)
}
