//! End-to-end operations against a workspace on disk.

use std::fs;
use std::path::{Path, PathBuf};

use lockstep::config::Config;
use lockstep::context::ServiceContext;
use lockstep::manifest::DependencyKind;
use lockstep::ops::{self, AddRequest, VersionInfo};
use tempfile::TempDir;

const ROOT: &str = r#"{
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

const CORE: &str = r#"{
  "name": "@example/core",
  "version": "1.1.0",
  "dependencies": {
    "graphql": "14.0.2"
  }
}
"#;

const ANGULAR: &str = r#"{
  "name": "@example/angular",
  "version": "1.0.0",
  "dependencies": {
    "@example/core": "1.1.0",
    "graphql": "14.0.2"
  }
}
"#;

const REACT: &str = r#"{
    "name": "@example/react",
    "version": "1.0.0",
    "dependencies": {
        "@example/core": "1.1.0"
    },
    "devDependencies": {
        "graphql": "14.0.2"
    }
}
"#;

fn write_manifest(location: &Path, contents: &str) {
    fs::create_dir_all(location).unwrap();
    fs::write(location.join("package.json"), contents).unwrap();
}

fn example_workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_manifest(root, ROOT);
    write_manifest(&root.join("packages/core"), CORE);
    write_manifest(&root.join("packages/angular"), ANGULAR);
    write_manifest(&root.join("packages/react"), REACT);
    dir
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(path).unwrap()
}

fn manifests(root: &Path) -> Vec<String> {
    ["", "packages/core", "packages/angular", "packages/react"]
        .iter()
        .map(|sub| read(root.join(sub).join("package.json")))
        .collect()
}

#[tokio::test]
async fn example_workspace_is_consistent() {
    let dir = example_workspace();
    let config = Config::new(dir.path());
    let ctx = ServiceContext::live(&config);

    let report = ops::check(&ctx, &config, None).await.unwrap();

    assert!(report.is_healthy());
    assert!(report.get("graphql").is_some());
    assert!(report.get("@example/core").is_some());
}

#[tokio::test]
async fn add_dev_dependency_touches_only_root() {
    let dir = example_workspace();
    let config = Config::new(dir.path());
    let ctx = ServiceContext::live(&config);
    let before = manifests(dir.path());

    let mut request = AddRequest::new("prettier");
    request.version = Some("1.15.0".into());
    request.kind = DependencyKind::Dev;
    ops::add(&ctx, &config, &request).await.unwrap();

    let after = manifests(dir.path());
    assert_ne!(after[0], before[0]);
    assert!(after[0].contains("\"devDependencies\": {\n    \"prettier\": \"1.15.0\"\n  }"));
    assert_eq!(after[1..], before[1..]);
}

#[tokio::test]
async fn set_rewrites_every_consumer_and_keeps_layout() {
    let dir = example_workspace();
    let config = Config::new(dir.path());
    let ctx = ServiceContext::live(&config);
    let original = manifests(dir.path());

    let result = ops::set(&ctx, &config, "graphql", "14.0.3").await.unwrap();
    assert_eq!(result.locations.len(), 4);
    assert_eq!(
        ops::get(&ctx, &config, "graphql").await.unwrap(),
        VersionInfo::Consistent("14.0.3".into())
    );
    assert!(ops::check(&ctx, &config, None).await.unwrap().is_healthy());
    assert!(read(dir.path().join("packages/react/package.json"))
        .contains("    \"devDependencies\": {\n        \"graphql\": \"14.0.3\"\n    }"));

    ops::set(&ctx, &config, "graphql", "14.0.2").await.unwrap();
    assert_eq!(manifests(dir.path()), original);
}

#[tokio::test]
async fn drift_on_disk_is_reported() {
    let dir = example_workspace();
    write_manifest(&dir.path().join("packages/core"), &CORE.replace("14.0.2", "14.0.1"));
    let config = Config::new(dir.path());
    let ctx = ServiceContext::live(&config);

    let report = ops::check(&ctx, &config, None).await.unwrap();

    let drifted: Vec<&str> = report.drifted().map(|(name, _)| name).collect();
    assert_eq!(drifted, ["graphql"]);
    assert!(report.ensure_healthy().is_err());
}
