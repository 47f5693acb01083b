//! In-memory filesystem adapter.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::future::ready;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::PortError;
use crate::ports::filesystem::{FileSystem, FsFuture};

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    writes: BTreeMap<PathBuf, usize>,
    reads: BTreeMap<PathBuf, usize>,
    failing_writes: HashSet<PathBuf>,
}

/// Filesystem held entirely in memory.
///
/// Directories exist implicitly as prefixes of stored file paths. Every read
/// and write is counted per path so tests can assert how often a manifest
/// was touched.
#[derive(Default)]
pub struct MemoryFileSystem {
    state: Mutex<State>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, returning `self` for chaining.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Adds or replaces a file without counting it as a write.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.files.insert(path.into(), contents.into());
        }
    }

    /// Makes every subsequent write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_writes.insert(path.into());
        }
    }

    /// Returns the current contents of a file.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.state.lock().ok()?.files.get(path).cloned()
    }

    /// Number of successful writes to `path`.
    #[must_use]
    pub fn write_count(&self, path: &Path) -> usize {
        self.state.lock().map_or(0, |state| state.writes.get(path).copied().unwrap_or(0))
    }

    /// Number of reads of `path`.
    #[must_use]
    pub fn read_count(&self, path: &Path) -> usize {
        self.state.lock().map_or(0, |state| state.reads.get(path).copied().unwrap_or(0))
    }

    /// Total number of successful writes across all paths.
    #[must_use]
    pub fn total_writes(&self) -> usize {
        self.state.lock().map_or(0, |state| state.writes.values().sum())
    }

    fn read_sync(&self, path: &Path) -> Result<String, PortError> {
        let mut state = self.state.lock().map_err(|_| "memory filesystem lock poisoned")?;
        *state.reads.entry(path.to_path_buf()).or_default() += 1;
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn write_sync(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let mut state = self.state.lock().map_err(|_| "memory filesystem lock poisoned")?;
        if state.failing_writes.contains(path) {
            return Err(format!("write refused: {}", path.display()).into());
        }
        state.files.insert(path.to_path_buf(), contents.to_string());
        *state.writes.entry(path.to_path_buf()).or_default() += 1;
        Ok(())
    }

    fn exists_sync(&self, path: &Path) -> Result<bool, PortError> {
        let state = self.state.lock().map_err(|_| "memory filesystem lock poisoned")?;
        Ok(state.files.keys().any(|k| k.starts_with(path)))
    }

    fn list_sync(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let state = self.state.lock().map_err(|_| "memory filesystem lock poisoned")?;
        let names: BTreeSet<String> = state
            .files
            .keys()
            .filter_map(|k| k.strip_prefix(path).ok())
            .filter_map(|rest| match rest.components().next() {
                Some(Component::Normal(name)) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if names.is_empty() {
            return Err(format!("not a directory: {}", path.display()).into());
        }
        Ok(names.into_iter().collect())
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string<'a>(&'a self, path: &'a Path) -> FsFuture<'a, String> {
        Box::pin(ready(self.read_sync(path)))
    }

    fn write<'a>(&'a self, path: &'a Path, contents: &'a str) -> FsFuture<'a, ()> {
        Box::pin(ready(self.write_sync(path, contents)))
    }

    fn exists<'a>(&'a self, path: &'a Path) -> FsFuture<'a, bool> {
        Box::pin(ready(self.exists_sync(path)))
    }

    fn list_dir<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<String>> {
        Box::pin(ready(self.list_sync(path)))
    }
}
