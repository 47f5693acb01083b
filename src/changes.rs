//! Change engine: batches manifest edits per location and commits them.
//!
//! Edits are scheduled in memory and touch nothing until [`ChangeSet::commit`].
//! A commit reads every affected manifest fresh, applies that location's
//! edits in schedule order to a copy of the parsed data, and only when all
//! locations staged cleanly writes them back. Writes are not transactional:
//! if one fails, the others that already landed stay on disk.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::manifest::{DependencyKind, Formatting, ManifestStore};

/// A single manifest edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Sets `name` in the table of `kind`, creating the table if needed.
    Insert {
        /// Dependency name.
        name: String,
        /// Version to declare.
        version: String,
        /// Target table.
        kind: DependencyKind,
    },
    /// Sets the manifest's own version when its name is `name`, and rewrites
    /// existing direct and dev declarations of `name`.
    Update {
        /// Package name.
        name: String,
        /// New version.
        version: String,
    },
    /// Removes `name` from the direct and dev tables.
    Delete {
        /// Dependency name.
        name: String,
    },
}

/// An edit targeted at one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Package directory whose manifest is edited.
    pub location: PathBuf,
    /// The edit.
    pub edit: Edit,
}

impl Change {
    /// Declares `name@version` in the `kind` table at `location`.
    #[must_use]
    pub fn insert(
        location: impl Into<PathBuf>,
        name: impl Into<String>,
        version: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        let edit = Edit::Insert { name: name.into(), version: version.into(), kind };
        Self { location: location.into(), edit }
    }

    /// Moves `name` to `version` at `location`.
    #[must_use]
    pub fn update(
        location: impl Into<PathBuf>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let edit = Edit::Update { name: name.into(), version: version.into() };
        Self { location: location.into(), edit }
    }

    /// Drops `name` at `location`.
    #[must_use]
    pub fn delete(location: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { location: location.into(), edit: Edit::Delete { name: name.into() } }
    }
}

/// Applies `edits` in order to a copy of `data`.
#[must_use]
pub fn apply(data: &Map<String, Value>, edits: &[Edit]) -> Map<String, Value> {
    let mut data = data.clone();
    for edit in edits {
        match edit {
            Edit::Insert { name, version, kind } => {
                let table = data
                    .entry(kind.field())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !table.is_object() {
                    *table = Value::Object(Map::new());
                }
                if let Value::Object(table) = table {
                    table.insert(name.clone(), Value::String(version.clone()));
                }
            }
            Edit::Update { name, version } => {
                if data.get("name").and_then(Value::as_str) == Some(name.as_str()) {
                    data.insert("version".to_string(), Value::String(version.clone()));
                }
                for kind in [DependencyKind::Direct, DependencyKind::Dev] {
                    if let Some(Value::Object(table)) = data.get_mut(kind.field()) {
                        if let Some(entry) = table.get_mut(name) {
                            *entry = Value::String(version.clone());
                        }
                    }
                }
            }
            Edit::Delete { name } => {
                for kind in [DependencyKind::Direct, DependencyKind::Dev] {
                    if let Some(Value::Object(table)) = data.get_mut(kind.field()) {
                        table.shift_remove(name);
                    }
                }
            }
        }
    }
    data
}

struct Staged {
    location: PathBuf,
    data: Map<String, Value>,
    formatting: Formatting,
}

async fn stage(store: ManifestStore<'_>, location: &Path, edits: &[Edit]) -> Result<Staged> {
    let document = store.read(location).await?;
    let formatting = document.formatting();
    let data = apply(&document.data, edits);
    tracing::debug!(location = %location.display(), edits = edits.len(), "staged changes");
    Ok(Staged { location: location.to_path_buf(), data, formatting })
}

/// Pending edits grouped by location, in first-scheduled order.
pub struct ChangeSet<'a> {
    store: ManifestStore<'a>,
    pending: IndexMap<PathBuf, Vec<Edit>>,
}

impl<'a> ChangeSet<'a> {
    /// Creates an empty change set writing through `store`.
    #[must_use]
    pub fn new(store: ManifestStore<'a>) -> Self {
        Self { store, pending: IndexMap::new() }
    }

    /// Queues a change; nothing is read or written.
    pub fn schedule(&mut self, change: Change) {
        self.pending.entry(change.location).or_default().push(change.edit);
    }

    /// Locations with pending edits.
    pub fn locations(&self) -> impl Iterator<Item = &Path> {
        self.pending.keys().map(PathBuf::as_path)
    }

    /// Returns `true` if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Writes every pending edit and returns the affected locations.
    ///
    /// The batch is emptied whether or not the commit succeeds. All
    /// locations are read and staged concurrently; writes begin only once
    /// every location staged, and then also run concurrently. Every started
    /// operation runs to completion before the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first read, parse or write failure. A read or parse
    /// failure means nothing was written; a write failure may leave other
    /// locations already rewritten.
    pub async fn commit(&mut self) -> Result<Vec<PathBuf>> {
        let pending = std::mem::take(&mut self.pending);
        let store = self.store;

        let staged = join_all(
            pending.iter().map(|(location, edits)| stage(store, location, edits)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let written = join_all(staged.iter().map(|staged| async move {
            store.write(&staged.location, &staged.data, &staged.formatting).await?;
            tracing::info!(location = %staged.location.display(), "wrote manifest");
            Ok::<_, Error>(())
        }))
        .await;
        written.into_iter().collect::<Result<Vec<()>>>()?;

        Ok(pending.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{example_fs, ANGULAR, CORE, REACT, ROOT};

    fn manifest_path(location: &str) -> PathBuf {
        PathBuf::from(format!("{location}/package.json"))
    }

    fn parsed(fs: &crate::adapters::memory::MemoryFileSystem, location: &str) -> Value {
        serde_json::from_str(&fs.contents(&manifest_path(location)).unwrap()).unwrap()
    }

    #[test]
    fn apply_leaves_input_untouched() {
        let data: Map<String, Value> =
            serde_json::from_str(r#"{"name":"a","dependencies":{"x":"1.0.0"}}"#).unwrap();
        let before = data.clone();

        let after = apply(&data, &[Edit::Delete { name: "x".into() }]);

        assert_eq!(data, before);
        assert_eq!(after["dependencies"], serde_json::json!({}));
    }

    #[test]
    fn update_touches_own_version_and_existing_entries_only() {
        let data: Map<String, Value> = serde_json::from_str(
            r#"{
                "name": "x",
                "version": "1.0.0",
                "devDependencies": {"x": "0.9.0"},
                "peerDependencies": {"x": "^1.0.0"}
            }"#,
        )
        .unwrap();

        let after = apply(&data, &[Edit::Update { name: "x".into(), version: "2.0.0".into() }]);

        assert_eq!(after["version"], "2.0.0");
        assert_eq!(after["devDependencies"]["x"], "2.0.0");
        assert_eq!(after["peerDependencies"]["x"], "^1.0.0");
        assert!(!after.contains_key("dependencies"));
    }

    #[test]
    fn delete_of_absent_name_is_noop() {
        let data: Map<String, Value> = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(apply(&data, &[Edit::Delete { name: "ghost".into() }]), data);
    }

    #[tokio::test]
    async fn insert_dev_dependency_touches_only_its_location() {
        let fs = example_fs();
        let mut changes = ChangeSet::new(ManifestStore::new(fs.as_ref()));
        changes.schedule(Change::insert(ROOT, "prettier", "1.15.0", DependencyKind::Dev));

        let affected = changes.commit().await.unwrap();

        assert_eq!(affected, vec![PathBuf::from(ROOT)]);
        assert_eq!(fs.total_writes(), 1);
        assert_eq!(parsed(&fs, ROOT)["devDependencies"]["prettier"], "1.15.0");
        assert!(fs
            .contents(&manifest_path(ROOT))
            .unwrap()
            .ends_with("  \"devDependencies\": {\n    \"prettier\": \"1.15.0\"\n  }\n}\n"));
        for location in [CORE, ANGULAR, REACT] {
            assert_eq!(fs.write_count(&manifest_path(location)), 0);
        }
    }

    #[tokio::test]
    async fn one_round_trip_per_location_in_schedule_order() {
        let fs = example_fs();
        let mut changes = ChangeSet::new(ManifestStore::new(fs.as_ref()));
        changes.schedule(Change::insert(REACT, "lodash", "4.17.0", DependencyKind::Direct));
        changes.schedule(Change::update(REACT, "lodash", "4.17.11"));
        changes.schedule(Change::delete(REACT, "@example/core"));

        changes.commit().await.unwrap();

        let path = manifest_path(REACT);
        assert_eq!(fs.read_count(&path), 1);
        assert_eq!(fs.write_count(&path), 1);
        let react = parsed(&fs, REACT);
        assert_eq!(react["dependencies"], serde_json::json!({"lodash": "4.17.11"}));
        assert!(fs.contents(&path).unwrap().contains("\n        \"lodash\": \"4.17.11\"\n"));
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent() {
        let fs = example_fs();
        let mut changes = ChangeSet::new(ManifestStore::new(fs.as_ref()));

        changes.schedule(Change::update(CORE, "graphql", "14.0.3"));
        changes.commit().await.unwrap();
        let first = fs.contents(&manifest_path(CORE)).unwrap();

        changes.schedule(Change::update(CORE, "graphql", "14.0.3"));
        changes.commit().await.unwrap();

        assert_eq!(fs.contents(&manifest_path(CORE)).unwrap(), first);
        assert_eq!(parsed(&fs, CORE)["dependencies"]["graphql"], "14.0.3");
    }

    #[tokio::test]
    async fn commit_clears_the_batch() {
        let fs = example_fs();
        let mut changes = ChangeSet::new(ManifestStore::new(fs.as_ref()));
        changes.schedule(Change::update(CORE, "graphql", "14.0.3"));

        changes.commit().await.unwrap();

        assert!(changes.is_empty());
        assert!(changes.commit().await.unwrap().is_empty());
        assert_eq!(fs.total_writes(), 1);
    }

    #[tokio::test]
    async fn read_failure_prevents_every_write() {
        let fs = example_fs();
        let mut changes = ChangeSet::new(ManifestStore::new(fs.as_ref()));
        changes.schedule(Change::update(ROOT, "graphql", "14.0.3"));
        changes.schedule(Change::update("/ws/packages/missing", "graphql", "14.0.3"));

        let err = changes.commit().await.unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(fs.total_writes(), 0);
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_surfaced_without_rollback() {
        let fs = example_fs();
        fs.fail_writes_to(manifest_path(CORE));
        let mut changes = ChangeSet::new(ManifestStore::new(fs.as_ref()));
        changes.schedule(Change::update(ROOT, "graphql", "14.0.3"));
        changes.schedule(Change::update(CORE, "graphql", "14.0.3"));

        let err = changes.commit().await.unwrap_err();

        match err {
            Error::Io { path, .. } => assert_eq!(path, manifest_path(CORE)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(parsed(&fs, ROOT)["dependencies"]["graphql"], "14.0.3");
        assert_eq!(parsed(&fs, CORE)["dependencies"]["graphql"], "14.0.2");
    }
}
