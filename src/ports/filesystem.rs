//! Filesystem port for manifest I/O.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::error::PortError;

/// Boxed future returned by [`FileSystem`] methods to keep the trait dyn-compatible.
pub type FsFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// Provides asynchronous access to files.
///
/// Reads and writes of different manifests are started concurrently, so every
/// method returns a future instead of blocking.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string<'a>(&'a self, path: &'a Path) -> FsFuture<'a, String>;

    /// Writes the given contents to a file, replacing it entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write<'a>(&'a self, path: &'a Path, contents: &'a str) -> FsFuture<'a, ()>;

    /// Returns `true` if the path exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists<'a>(&'a self, path: &'a Path) -> FsFuture<'a, bool>;

    /// Lists the names of the entries in a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<String>>;
}
