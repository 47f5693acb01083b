//! Workspace registry: every manifest of the workspace keyed by location.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::manifest::{Manifest, ManifestStore};

/// Manifests keyed by their absolute location, in discovery order.
///
/// A registry is a snapshot: it has no mutation methods and is rebuilt after
/// manifests change on disk.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<PathBuf, Manifest>,
}

/// A workspace package together with where it lives.
#[derive(Debug, Clone, Copy)]
pub struct LocalPackage<'a> {
    /// Package directory.
    pub location: &'a Path,
    /// Its manifest.
    pub manifest: &'a Manifest,
}

/// Workspace packages keyed by name.
pub type PackageMap<'a> = IndexMap<&'a str, LocalPackage<'a>>;

impl Registry {
    /// Loads the manifest of every location concurrently.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any manifest cannot be read or parsed, or if two
    /// locations declare the same package name.
    pub async fn build(store: ManifestStore<'_>, locations: &[PathBuf]) -> Result<Self> {
        let manifests = try_join_all(locations.iter().map(|location| async move {
            let manifest = store.load(location).await?;
            tracing::debug!(
                location = %location.display(),
                name = %manifest.name,
                "loaded manifest"
            );
            Ok::<_, Error>((location.clone(), manifest))
        }))
        .await?;

        Self::from_entries(manifests)
    }

    /// Builds a registry from already loaded manifests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePackageName`] if two locations share a name.
    pub fn from_entries(entries: impl IntoIterator<Item = (PathBuf, Manifest)>) -> Result<Self> {
        let mut registry = Self::default();
        for (location, manifest) in entries {
            if let Some(first) = registry.location_of(&manifest.name) {
                return Err(Error::DuplicatePackageName {
                    name: manifest.name,
                    first: first.to_path_buf(),
                    second: location,
                });
            }
            registry.entries.insert(location, manifest);
        }
        Ok(registry)
    }

    /// Number of manifests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no manifest was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(location, manifest)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Manifest)> {
        self.entries.iter().map(|(location, manifest)| (location.as_path(), manifest))
    }

    /// The manifest loaded from `location`.
    #[must_use]
    pub fn get(&self, location: &Path) -> Option<&Manifest> {
        self.entries.get(location)
    }

    /// Derives the name-keyed view.
    ///
    /// If two locations declared the same name the later one would win, but
    /// [`Registry::from_entries`] already refuses such registries.
    #[must_use]
    pub fn package_map(&self) -> PackageMap<'_> {
        self.iter()
            .map(|(location, manifest)| {
                (manifest.name.as_str(), LocalPackage { location, manifest })
            })
            .collect()
    }

    /// Returns `true` if `name` is a workspace package.
    #[must_use]
    pub fn is_local(&self, name: &str) -> bool {
        self.lookup_local(name).is_some()
    }

    /// The manifest of workspace package `name`.
    #[must_use]
    pub fn lookup_local(&self, name: &str) -> Option<&Manifest> {
        self.entries.values().find(|manifest| manifest.name == name)
    }

    /// Where workspace package `name` lives.
    #[must_use]
    pub fn location_of(&self, name: &str) -> Option<&Path> {
        self.iter().find(|(_, manifest)| manifest.name == name).map(|(location, _)| location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::test_support::{add_manifest, example_fs, example_locations, ANGULAR, CORE, ROOT};

    #[tokio::test]
    async fn one_entry_per_location() {
        let fs = example_fs();
        let locations = example_locations();

        let registry = Registry::build(ManifestStore::new(fs.as_ref()), &locations).await.unwrap();

        assert_eq!(registry.len(), locations.len());
        let loaded: Vec<&Path> = registry.iter().map(|(location, _)| location).collect();
        let expected: Vec<&Path> = locations.iter().map(PathBuf::as_path).collect();
        assert_eq!(loaded, expected);
        assert_eq!(registry.get(Path::new(ROOT)).unwrap().name, "root-example");
    }

    #[tokio::test]
    async fn any_failed_load_fails_the_build() {
        let fs = example_fs();
        let mut locations = example_locations();
        locations.push(PathBuf::from("/ws/packages/missing"));

        let err = Registry::build(ManifestStore::new(fs.as_ref()), &locations).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let fs = MemoryFileSystem::new();
        add_manifest(&fs, "/a", r#"{"name":"same","version":"1.0.0"}"#);
        add_manifest(&fs, "/b", r#"{"name":"same","version":"2.0.0"}"#);

        let locations = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        let err = Registry::build(ManifestStore::new(&fs), &locations).await.unwrap_err();

        match err {
            Error::DuplicatePackageName { name, first, second } => {
                assert_eq!(name, "same");
                assert_eq!(first, PathBuf::from("/a"));
                assert_eq!(second, PathBuf::from("/b"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn package_map_and_local_lookups() {
        let fs = example_fs();
        let registry =
            Registry::build(ManifestStore::new(fs.as_ref()), &example_locations()).await.unwrap();

        let map = registry.package_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map["@example/core"].location, Path::new(CORE));
        assert_eq!(map["@example/angular"].manifest.version, "1.0.0");

        assert!(registry.is_local("@example/core"));
        assert!(!registry.is_local("graphql"));
        assert_eq!(registry.lookup_local("@example/core").unwrap().version, "1.1.0");
        assert_eq!(registry.location_of("@example/angular"), Some(Path::new(ANGULAR)));
        assert!(registry.lookup_local("graphql").is_none());
    }
}
