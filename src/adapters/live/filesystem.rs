//! Live filesystem adapter using `tokio::fs`.

use std::path::Path;

use crate::error::PortError;
use crate::ports::filesystem::{FileSystem, FsFuture};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string<'a>(&'a self, path: &'a Path) -> FsFuture<'a, String> {
        Box::pin(async move { tokio::fs::read_to_string(path).await.map_err(PortError::from) })
    }

    fn write<'a>(&'a self, path: &'a Path, contents: &'a str) -> FsFuture<'a, ()> {
        Box::pin(write_file(path, contents))
    }

    fn exists<'a>(&'a self, path: &'a Path) -> FsFuture<'a, bool> {
        Box::pin(async move { tokio::fs::try_exists(path).await.map_err(PortError::from) })
    }

    fn list_dir<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<String>> {
        Box::pin(list_entries(path))
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), PortError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

async fn list_entries(path: &Path) -> Result<Vec<String>, PortError> {
    let mut entries = Vec::new();
    let mut dir = tokio::fs::read_dir(path).await?;
    while let Some(entry) = dir.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            entries.push(name.to_string());
        }
    }
    entries.sort();
    Ok(entries)
}
