//! Shared fixtures for unit tests.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::memory::MemoryFileSystem;

pub(crate) const ROOT: &str = "/ws";
pub(crate) const CORE: &str = "/ws/packages/core";
pub(crate) const ANGULAR: &str = "/ws/packages/angular";
pub(crate) const REACT: &str = "/ws/packages/react";

const ROOT_MANIFEST: &str = r#"{
  "name": "root-example",
  "version": "1.0.0",
  "private": true,
  "workspaces": [
    "packages/*"
  ],
  "dependencies": {
    "graphql": "14.0.2"
  }
}
"#;

const CORE_MANIFEST: &str = r#"{
  "name": "@example/core",
  "version": "1.1.0",
  "dependencies": {
    "graphql": "14.0.2"
  }
}
"#;

const ANGULAR_MANIFEST: &str = r#"{
  "name": "@example/angular",
  "version": "1.0.0",
  "dependencies": {
    "@example/core": "1.1.0",
    "graphql": "14.0.2"
  }
}
"#;

const REACT_MANIFEST: &str = r#"{
    "name": "@example/react",
    "version": "1.0.0",
    "dependencies": {
        "@example/core": "1.1.0"
    },
    "devDependencies": {
        "graphql": "14.0.2"
    },
    "peerDependencies": {
        "react": "^16.6.0"
    }
}
"#;

/// Root manifest plus three packages: core, angular and react.
///
/// Every package declares `graphql@14.0.2`; angular and react consume core.
pub(crate) fn example_fs() -> Arc<MemoryFileSystem> {
    Arc::new(
        MemoryFileSystem::new()
            .with_file(format!("{ROOT}/package.json"), ROOT_MANIFEST)
            .with_file(format!("{CORE}/package.json"), CORE_MANIFEST)
            .with_file(format!("{ANGULAR}/package.json"), ANGULAR_MANIFEST)
            .with_file(format!("{REACT}/package.json"), REACT_MANIFEST),
    )
}

/// Locations of the example workspace, root first.
pub(crate) fn example_locations() -> Vec<PathBuf> {
    [ROOT, ANGULAR, CORE, REACT].into_iter().map(PathBuf::from).collect()
}

/// Writes a one-line manifest at `location`.
pub(crate) fn add_manifest(fs: &MemoryFileSystem, location: &str, json: &str) {
    fs.insert(format!("{location}/package.json"), json);
}
