//! `lockstep remove` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::ops;

/// Execute the `remove` command.
///
/// # Errors
///
/// Returns an error string if the parent is unknown or the manifest cannot be rewritten.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    parent: Option<&str>,
) -> Result<(), String> {
    let removed = ops::remove(ctx, config, name, parent).await.map_err(|e| e.to_string())?;
    println!("Removed {} from {} ({})", removed.name, removed.parent, removed.location.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::test_support::{example_fs, CORE, ROOT};

    #[tokio::test]
    async fn remove_command_rewrites_parent() {
        let fs = example_fs();
        let ctx = ServiceContext::in_memory(fs.clone());

        run(&ctx, &Config::new(ROOT), "graphql", Some("@example/core")).await.unwrap();

        let core = fs.contents(&Path::new(CORE).join("package.json")).unwrap();
        assert!(!core.contains("graphql"));
    }
}
