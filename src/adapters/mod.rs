//! Port implementations.
//!
//! `live` talks to the real disk, processes, and registry; `memory` keeps
//! everything in process for deterministic tests.

pub mod live;
pub mod memory;
