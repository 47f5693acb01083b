//! Package manifests (`package.json`) and the store that reads and writes them.
//!
//! A manifest is read as raw text plus its parsed JSON object. Writes
//! re-serialize the whole object with the indentation detected in the raw
//! text, so a read followed by a write with no edits reproduces the file.

pub mod indent;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ports::filesystem::FileSystem;

pub use indent::Indent;

/// File name of a package manifest inside its location.
pub const MANIFEST_FILE: &str = "package.json";

/// Dependency name to version specifier, in file order.
pub type DependencyMap = IndexMap<String, String>;

/// Which dependency table a declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `dependencies`
    Direct,
    /// `devDependencies`
    Dev,
    /// `peerDependencies`
    Peer,
}

impl DependencyKind {
    /// The manifest key holding this table.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Direct => "dependencies",
            Self::Dev => "devDependencies",
            Self::Peer => "peerDependencies",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Dev => write!(f, "dev"),
            Self::Peer => write!(f, "peer"),
        }
    }
}

/// Workspace member patterns, either a bare list or `{ "packages": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    /// `"workspaces": ["packages/*"]`
    Patterns(Vec<String>),
    /// `"workspaces": { "packages": ["packages/*"] }`
    Detailed {
        /// Member patterns.
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    /// The member patterns regardless of shape.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(patterns) | Self::Detailed { packages: patterns } => patterns,
        }
    }
}

/// Tool settings under the manifest's `config` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Executable run after changes, relative to the manifest's directory.
    #[serde(default)]
    pub hook: Option<String>,
}

/// The fields of a manifest this tool reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Package name, unique within a workspace.
    pub name: String,

    /// Package version; empty when the manifest has none.
    #[serde(default)]
    pub version: String,

    /// Runtime dependencies.
    #[serde(default)]
    pub dependencies: Option<DependencyMap>,

    /// Development-only dependencies.
    #[serde(default)]
    pub dev_dependencies: Option<DependencyMap>,

    /// Peer dependencies.
    #[serde(default)]
    pub peer_dependencies: Option<DependencyMap>,

    /// Whether the package is unpublished.
    #[serde(default)]
    pub private: bool,

    /// Workspace member patterns (root manifests only).
    #[serde(default)]
    pub workspaces: Option<Workspaces>,

    /// Tool configuration.
    #[serde(default)]
    pub config: Option<ManifestConfig>,
}

impl Manifest {
    /// Creates a manifest with only a name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: None,
            dev_dependencies: None,
            peer_dependencies: None,
            private: false,
            workspaces: None,
            config: None,
        }
    }

    /// Returns the table of the given kind, if present.
    #[must_use]
    pub fn table(&self, kind: DependencyKind) -> Option<&DependencyMap> {
        match kind {
            DependencyKind::Direct => self.dependencies.as_ref(),
            DependencyKind::Dev => self.dev_dependencies.as_ref(),
            DependencyKind::Peer => self.peer_dependencies.as_ref(),
        }
    }

    /// Returns the version declared for `name` in the table of `kind`.
    #[must_use]
    pub fn dependency(&self, kind: DependencyKind, name: &str) -> Option<&str> {
        self.table(kind).and_then(|table| table.get(name)).map(String::as_str)
    }

    /// Union of dependency names across all three tables, first occurrence order.
    #[must_use]
    pub fn dependency_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for kind in [DependencyKind::Direct, DependencyKind::Dev, DependencyKind::Peer] {
            for name in self.table(kind).into_iter().flat_map(|table| table.keys()) {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// The configured change hook, if any.
    #[must_use]
    pub fn hook(&self) -> Option<&str> {
        self.config.as_ref().and_then(|config| config.hook.as_deref())
    }
}

/// How a manifest file was laid out, reused on write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatting {
    /// Indentation unit.
    pub indent: Indent,
    /// Whether the file ended with a newline.
    pub trailing_newline: bool,
}

impl Formatting {
    /// Detects the formatting of `raw`.
    #[must_use]
    pub fn detect(raw: &str) -> Self {
        Self { indent: indent::detect(raw), trailing_newline: raw.ends_with('\n') }
    }

    /// Serializes `data` in this formatting.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be serialized.
    pub fn render(&self, data: &Map<String, Value>) -> serde_json::Result<String> {
        let mut out = if self.indent.is_compact() {
            serde_json::to_string(data)?
        } else {
            let mut buf = Vec::new();
            let formatter =
                serde_json::ser::PrettyFormatter::with_indent(self.indent.as_str().as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            data.serialize(&mut serializer)?;
            String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)?
        };
        if self.trailing_newline {
            out.push('\n');
        }
        Ok(out)
    }
}

/// A manifest as read from disk.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    /// Path of the manifest file.
    pub path: PathBuf,
    /// Raw text as read.
    pub raw: String,
    /// Parsed top-level object, all fields included.
    pub data: Map<String, Value>,
}

impl ManifestDocument {
    /// Parses raw manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `raw` is not a JSON object.
    pub fn parse(path: impl Into<PathBuf>, raw: String) -> Result<Self> {
        let path = path.into();
        let data = serde_json::from_str(&raw)
            .map_err(|source| Error::Parse { path: path.clone(), source })?;
        Ok(Self { path, raw, data })
    }

    /// The formatting detected from the raw text.
    #[must_use]
    pub fn formatting(&self) -> Formatting {
        Formatting::detect(&self.raw)
    }

    /// The typed view of the parsed data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if required fields are missing or mistyped.
    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::deserialize(&Value::Object(self.data.clone()))
            .map_err(|source| Error::Parse { path: self.path.clone(), source })
    }
}

/// Reads and writes manifests through the [`FileSystem`] port.
///
/// Locations are package directories; the manifest is `<location>/package.json`.
/// Nothing is cached: every read goes to the filesystem.
#[derive(Clone, Copy)]
pub struct ManifestStore<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> ManifestStore<'a> {
    /// Creates a store over the given filesystem.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Path of the manifest file for `location`.
    #[must_use]
    pub fn manifest_path(location: &Path) -> PathBuf {
        location.join(MANIFEST_FILE)
    }

    /// Reads the manifest at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file is missing or unreadable and
    /// [`Error::Parse`] if it is not a JSON object.
    pub async fn read(&self, location: &Path) -> Result<ManifestDocument> {
        let path = Self::manifest_path(location);
        let raw = self.fs.read_to_string(&path).await.map_err(|e| Error::io(&path, e))?;
        ManifestDocument::parse(path, raw)
    }

    /// Reads and types the manifest at `location`.
    ///
    /// # Errors
    ///
    /// See [`ManifestStore::read`] and [`ManifestDocument::manifest`].
    pub async fn load(&self, location: &Path) -> Result<Manifest> {
        self.read(location).await?.manifest()
    }

    /// Replaces the manifest at `location` with `data` in the given formatting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if `data` cannot be rendered and
    /// [`Error::Io`] if the write fails.
    pub async fn write(
        &self,
        location: &Path,
        data: &Map<String, Value>,
        formatting: &Formatting,
    ) -> Result<()> {
        let path = Self::manifest_path(location);
        let contents = formatting
            .render(data)
            .map_err(|source| Error::Serialize { path: path.clone(), source })?;
        self.fs.write(&path, &contents).await.map_err(|e| Error::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    const SAMPLE: &str = r#"{
    "name": "@example/core",
    "version": "1.1.0",
    "description": "keeps unknown fields",
    "dependencies": {
        "graphql": "14.0.2"
    },
    "devDependencies": {
        "typescript": "3.1.6"
    },
    "peerDependencies": {
        "graphql": "^14.0.0"
    },
    "config": {
        "hook": "./hook.sh"
    }
}
"#;

    #[tokio::test]
    async fn read_then_write_is_byte_identical() {
        let fs = MemoryFileSystem::new().with_file("/ws/core/package.json", SAMPLE);
        let store = ManifestStore::new(&fs);

        let doc = store.read(Path::new("/ws/core")).await.unwrap();
        store.write(Path::new("/ws/core"), &doc.data, &doc.formatting()).await.unwrap();

        assert_eq!(fs.contents(Path::new("/ws/core/package.json")).unwrap(), SAMPLE);
    }

    #[tokio::test]
    async fn compact_tab_and_unterminated_files_round_trip() {
        let samples = [
            r#"{"name":"a","version":"1.0.0","dependencies":{"b":"2.0.0"}}"#,
            "{\n\t\"name\": \"a\",\n\t\"dependencies\": {\n\t\t\"b\": \"2.0.0\"\n\t}\n}",
            "{\n  \"name\": \"a\",\n  \"files\": [\n    \"dist\"\n  ],\n  \"scripts\": {}\n}\n",
        ];
        for sample in samples {
            let fs = MemoryFileSystem::new().with_file("/a/package.json", sample);
            let store = ManifestStore::new(&fs);

            let doc = store.read(Path::new("/a")).await.unwrap();
            store.write(Path::new("/a"), &doc.data, &doc.formatting()).await.unwrap();

            assert_eq!(fs.contents(Path::new("/a/package.json")).unwrap(), sample);
        }
    }

    #[tokio::test]
    async fn load_types_known_fields() {
        let fs = MemoryFileSystem::new().with_file("/ws/core/package.json", SAMPLE);
        let manifest = ManifestStore::new(&fs).load(Path::new("/ws/core")).await.unwrap();

        assert_eq!(manifest.name, "@example/core");
        assert_eq!(manifest.dependency(DependencyKind::Direct, "graphql"), Some("14.0.2"));
        assert_eq!(manifest.dependency(DependencyKind::Peer, "graphql"), Some("^14.0.0"));
        assert_eq!(manifest.dependency_names(), vec!["graphql", "typescript"]);
        assert_eq!(manifest.hook(), Some("./hook.sh"));
        assert!(!manifest.private);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let fs = MemoryFileSystem::new();
        let err = ManifestStore::new(&fs).read(Path::new("/nowhere")).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn refused_write_is_io_error() {
        let fs = MemoryFileSystem::new().with_file("/ws/core/package.json", SAMPLE);
        fs.fail_writes_to("/ws/core/package.json");
        let store = ManifestStore::new(&fs);
        let doc = store.read(Path::new("/ws/core")).await.unwrap();

        let err =
            store.write(Path::new("/ws/core"), &doc.data, &doc.formatting()).await.unwrap_err();

        let expected = Path::new("/ws/core/package.json");
        assert!(matches!(err, Error::Io { ref path, .. } if path == expected));
        assert_eq!(fs.contents(Path::new("/ws/core/package.json")).as_deref(), Some(SAMPLE));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let fs = MemoryFileSystem::new().with_file("/bad/package.json", "{ nope");
        let err = ManifestStore::new(&fs).read(Path::new("/bad")).await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[tokio::test]
    async fn missing_name_is_parse_error() {
        let fs =
            MemoryFileSystem::new().with_file("/anon/package.json", r#"{"version":"1.0.0"}"#);
        let err = ManifestStore::new(&fs).load(Path::new("/anon")).await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn workspaces_accepts_both_shapes() {
        let list: Workspaces = serde_json::from_str(r#"["packages/*"]"#).unwrap();
        let detailed: Workspaces = serde_json::from_str(r#"{"packages":["packages/*"]}"#).unwrap();
        assert_eq!(list.patterns(), detailed.patterns());
    }
}
