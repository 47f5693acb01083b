//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the workspace engine and an
//! external system (disk, processes, the package registry).
//! Implementations live in `src/adapters/`.

pub mod dist_tags;
pub mod filesystem;
pub mod shell;

pub use dist_tags::{DistTagClient, DistTagFuture};
pub use filesystem::{FileSystem, FsFuture};
pub use shell::{ShellCommand, ShellExecutor, ShellFuture, ShellOutput};
