//! In-memory adapters for deterministic tests.

pub mod dist_tags;
pub mod filesystem;
pub mod shell;

pub use dist_tags::StaticDistTags;
pub use filesystem::MemoryFileSystem;
pub use shell::ScriptedShell;
