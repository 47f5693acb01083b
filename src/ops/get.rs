//! Reading the version a workspace uses for a name.

use serde::Serialize;

use super::load_registry;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::graph::{Declaration, DependencyGraph, DependencyRecord};
use crate::integrity::check_one;
use crate::registry::Registry;

/// The version of a name across the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VersionInfo {
    /// Every consumer agrees on this version.
    Consistent(String),
    /// Consumers disagree; here is who declares what.
    Drifted(DependencyRecord),
}

/// Determines the version of `name` in a built graph.
///
/// A consistent name reports the first consumer's direct or dev version. A
/// workspace package nobody consumes reports its own manifest version, and a
/// name only declared as a peer reports the first peer range.
///
/// # Errors
///
/// Returns [`Error::MissingPackage`] if `name` is not a node of the graph.
pub fn version_of(
    name: &str,
    graph: &DependencyGraph,
    registry: &Registry,
) -> Result<VersionInfo> {
    let result = check_one(name, graph)?;
    if !result.integrity {
        return Ok(VersionInfo::Drifted(result.consumers));
    }

    let consumers = &result.consumers;
    consumers
        .values()
        .find_map(Declaration::binding_version)
        .or_else(|| registry.lookup_local(name).map(|manifest| manifest.version.as_str()))
        .or_else(|| consumers.values().find_map(|d| d.peer.as_deref()))
        .map(|version| VersionInfo::Consistent(version.to_string()))
        .ok_or_else(|| Error::missing(name))
}

/// Discovers the workspace and reports the version of `name`.
///
/// # Errors
///
/// Returns [`Error::MissingPackage`] for unknown names and discovery or
/// manifest errors unchanged.
pub async fn get(ctx: &ServiceContext, config: &Config, name: &str) -> Result<VersionInfo> {
    let registry = load_registry(ctx, config).await?;
    let graph = DependencyGraph::build(&registry)?;
    version_of(name, &graph, &registry)
}
