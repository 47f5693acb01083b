//! Error taxonomy shared by the registry, graph, and change engine.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported by the workspace engine.
///
/// Every variant is recoverable by the caller; nothing inside the engine
/// treats one of these as fatal.
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying port error.
        source: PortError,
    },

    /// A manifest is not valid JSON or lacks a required field.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parser error.
        source: serde_json::Error,
    },

    /// Edited manifest data could not be turned back into text.
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        /// File that was being written.
        path: PathBuf,
        /// Underlying serializer error.
        source: serde_json::Error,
    },

    /// The name is not a node of the graph or not a workspace package.
    #[error("package '{name}' is not available in this workspace")]
    MissingPackage {
        /// Requested package name.
        name: String,
    },

    /// Adding a dependency edge would close a cycle.
    #[error("circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency {
        /// The packages forming the cycle, first element repeated at the end.
        cycle: Vec<String>,
    },

    /// Two or more distinct direct/dev versions are declared for a name.
    #[error("version drift detected for: {}", .names.join(", "))]
    VersionDrift {
        /// Drifted dependency names.
        names: Vec<String>,
    },

    /// A dist-tag was requested for a workspace-local package.
    #[error("can't use dist-tag '{tag}' on local package '{name}'")]
    TagOnLocalPackage {
        /// Local package name.
        name: String,
        /// Rejected tag.
        tag: String,
    },

    /// No next version could be computed for the release type.
    #[error("failed to bump '{name}' by '{release}'")]
    InvalidReleaseType {
        /// Package being bumped.
        name: String,
        /// Requested release type.
        release: String,
    },

    /// A package declares the name both as a direct and a dev dependency,
    /// or under the other kind than the one requested.
    #[error("'{package}' already declares '{name}' under a different dependency kind")]
    AmbiguousDependencyKind {
        /// Dependency name.
        name: String,
        /// Declaring package.
        package: String,
    },

    /// Two locations declare the same package name.
    #[error(
        "package name '{name}' is declared by both {} and {}",
        first.display(),
        second.display()
    )]
    DuplicatePackageName {
        /// Duplicated name.
        name: String,
        /// Location registered first.
        first: PathBuf,
        /// Location registered second.
        second: PathBuf,
    },

    /// The external registry could not resolve a dist-tag.
    #[error("failed to resolve {name}@{tag}: {message}")]
    Registry {
        /// Package name.
        name: String,
        /// Requested tag.
        tag: String,
        /// Collaborator failure.
        message: String,
    },

    /// Workspace discovery failed.
    #[error("workspace discovery failed: {0}")]
    Discovery(String),

    /// A change hook failed.
    #[error("hook in {} failed: {message}", location.display())]
    Hook {
        /// Location whose hook failed.
        location: PathBuf,
        /// Failure description.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: PortError) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self::MissingPackage { name: name.into() }
    }
}
