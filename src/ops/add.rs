//! Declaring a new dependency.

use std::path::PathBuf;

use serde::Serialize;

use super::{commit_and_notify, load_registry, target_package};
use crate::changes::{Change, ChangeSet};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::hooks::HookEvent;
use crate::manifest::{DependencyKind, ManifestStore};
use crate::resolve::{resolve_version, LATEST};

/// What to add and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    /// Dependency name.
    pub name: String,
    /// Version or dist-tag; `latest` when absent.
    pub version: Option<String>,
    /// Declaring workspace package; the root when absent.
    pub parent: Option<String>,
    /// Target table, direct or dev.
    pub kind: DependencyKind,
}

impl AddRequest {
    /// Adds `name` as a direct dependency of the root at `latest`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), version: None, parent: None, kind: DependencyKind::Direct }
    }
}

/// The declaration that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Added {
    /// Dependency name.
    pub name: String,
    /// Resolved version.
    pub version: String,
    /// Table it landed in.
    pub kind: DependencyKind,
    /// Declaring package.
    pub parent: String,
    /// Location of the declaring package.
    pub location: PathBuf,
}

/// Declares `request.name` in the parent's manifest.
///
/// # Errors
///
/// Returns [`Error::MissingPackage`] for an unknown parent,
/// [`Error::AmbiguousDependencyKind`] when the parent already declares the
/// name under the other kind, [`Error::CircularDependency`] when the new edge
/// would close a cycle, and resolution or commit failures unchanged.
pub async fn add(ctx: &ServiceContext, config: &Config, request: &AddRequest) -> Result<Added> {
    let registry = load_registry(ctx, config).await?;
    let (location, parent) = target_package(&registry, &config.cwd, request.parent.as_deref())?;
    let name = request.name.as_str();

    let conflicting = [DependencyKind::Direct, DependencyKind::Dev]
        .into_iter()
        .filter(|kind| *kind != request.kind)
        .any(|kind| parent.dependency(kind, name).is_some());
    if conflicting {
        return Err(Error::AmbiguousDependencyKind {
            name: name.to_string(),
            package: parent.name.clone(),
        });
    }

    let mut graph = DependencyGraph::build(&registry)?;
    graph.add_node(name);
    graph.add_dependency(&parent.name, name)?;

    let requested = request.version.as_deref().unwrap_or(LATEST);
    let version = resolve_version(name, requested, &registry, ctx.dist_tags.as_ref()).await?;

    let mut changes = ChangeSet::new(ManifestStore::new(ctx.fs.as_ref()));
    changes.schedule(Change::insert(location, name, &version, request.kind));
    let event = HookEvent::Add {
        name: name.to_string(),
        version: version.clone(),
        kind: request.kind,
        parent: parent.name.clone(),
    };
    commit_and_notify(ctx, changes, &event).await?;

    Ok(Added {
        name: name.to_string(),
        version,
        kind: request.kind,
        parent: parent.name.clone(),
        location: location.to_path_buf(),
    })
}
