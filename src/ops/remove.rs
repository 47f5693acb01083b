//! Dropping a dependency from one package.

use std::path::PathBuf;

use serde::Serialize;

use super::{commit_and_notify, load_registry, target_package};
use crate::changes::{Change, ChangeSet};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::hooks::HookEvent;
use crate::manifest::ManifestStore;

/// The declaration that was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removed {
    /// Dependency name.
    pub name: String,
    /// Package it was removed from.
    pub parent: String,
    /// Location of that package.
    pub location: PathBuf,
}

/// Removes `name` from the direct and dev tables of `parent` (the root when
/// `None`). A name the parent does not declare leaves its content unchanged.
///
/// # Errors
///
/// Returns [`crate::Error::MissingPackage`] for an unknown parent and commit
/// failures unchanged.
pub async fn remove(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    parent: Option<&str>,
) -> Result<Removed> {
    let registry = load_registry(ctx, config).await?;
    let (location, parent) = target_package(&registry, &config.cwd, parent)?;

    let mut changes = ChangeSet::new(ManifestStore::new(ctx.fs.as_ref()));
    changes.schedule(Change::delete(location, name));
    let event = HookEvent::Remove { name: name.to_string(), parent: parent.name.clone() };
    commit_and_notify(ctx, changes, &event).await?;

    Ok(Removed {
        name: name.to_string(),
        parent: parent.name.clone(),
        location: location.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::error::Error;
    use crate::test_support::{example_fs, REACT, ROOT};

    #[tokio::test]
    async fn removes_from_named_parent_only() {
        let fs = example_fs();
        let ctx = ServiceContext::in_memory(fs.clone());

        let removed =
            remove(&ctx, &Config::new(ROOT), "graphql", Some("@example/react")).await.unwrap();

        assert_eq!(removed.location, Path::new(REACT));
        let react: serde_json::Value =
            serde_json::from_str(&fs.contents(&Path::new(REACT).join("package.json")).unwrap())
                .unwrap();
        assert_eq!(react["devDependencies"], serde_json::json!({}));
        assert_eq!(react["peerDependencies"]["react"], "^16.6.0");
        assert_eq!(fs.total_writes(), 1);
    }

    #[tokio::test]
    async fn undeclared_name_is_a_noop_edit() {
        let fs = example_fs();
        let ctx = ServiceContext::in_memory(fs.clone());
        let root = Path::new(ROOT).join("package.json");
        let before = fs.contents(&root).unwrap();

        remove(&ctx, &Config::new(ROOT), "left-pad", None).await.unwrap();

        assert_eq!(fs.contents(&root).unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_parent_is_missing_package() {
        let ctx = ServiceContext::in_memory(example_fs());
        let err = remove(&ctx, &Config::new(ROOT), "graphql", Some("nope")).await.unwrap_err();
        assert!(matches!(err, Error::MissingPackage { .. }));
    }
}
