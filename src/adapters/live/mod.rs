//! Live adapters for real external interactions.

pub mod dist_tags;
pub mod filesystem;
pub mod shell;

pub use dist_tags::{LiveDistTagClient, DEFAULT_REGISTRY_URL};
pub use filesystem::LiveFileSystem;
pub use shell::LiveShellExecutor;
