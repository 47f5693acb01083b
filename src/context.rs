//! Service context bundling all port trait objects.

use std::sync::Arc;

use crate::adapters::live::{LiveDistTagClient, LiveFileSystem, LiveShellExecutor};
use crate::adapters::memory::{MemoryFileSystem, ScriptedShell, StaticDistTags};
use crate::config::Config;
use crate::ports::dist_tags::DistTagClient;
use crate::ports::filesystem::FileSystem;
use crate::ports::shell::ShellExecutor;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live or in-memory).
#[derive(Clone)]
pub struct ServiceContext {
    /// Filesystem for manifest I/O.
    pub fs: Arc<dyn FileSystem>,
    /// Process runner for discovery and hooks.
    pub shell: Arc<dyn ShellExecutor>,
    /// Registry client for dist-tag lookups.
    pub dist_tags: Arc<dyn DistTagClient>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for disk, processes, and the registry.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            fs: Arc::new(LiveFileSystem),
            shell: Arc::new(LiveShellExecutor),
            dist_tags: Arc::new(LiveDistTagClient::new(config.registry_url.clone())),
        }
    }

    /// Creates a context over the given in-memory filesystem.
    ///
    /// The shell knows no programs and the registry publishes no tags; replace
    /// the fields to script them.
    #[must_use]
    pub fn in_memory(fs: Arc<MemoryFileSystem>) -> Self {
        Self {
            fs,
            shell: Arc::new(ScriptedShell::new()),
            dist_tags: Arc::new(StaticDistTags::new()),
        }
    }
}
