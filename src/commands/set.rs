//! `lockstep set` and `lockstep bump` commands.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::ops::{self, VersionSet};

/// Execute the `set` command.
///
/// # Errors
///
/// Returns an error string if the version cannot be resolved or written.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    version: &str,
) -> Result<(), String> {
    let result = ops::set(ctx, config, name, version).await.map_err(|e| e.to_string())?;
    println!("{}", render("Set", &result));
    Ok(())
}

/// Execute the `bump` command.
///
/// # Errors
///
/// Returns an error string if the current version is ambiguous, cannot be
/// incremented, or the new version cannot be written.
pub async fn run_bump(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    release: &str,
    preid: Option<&str>,
) -> Result<(), String> {
    let result =
        ops::bump(ctx, config, name, release, preid).await.map_err(|e| e.to_string())?;
    println!("{}", render("Bumped", &result));
    Ok(())
}

fn render(verb: &str, result: &VersionSet) -> String {
    let mut out = format!(
        "{verb} {} to {} in {} manifest(s)",
        result.name,
        result.version,
        result.locations.len()
    );
    for location in &result.locations {
        out.push_str(&format!("\n  {}", location.display()));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::test_support::{example_fs, ROOT};

    #[test]
    fn render_lists_locations() {
        let result = VersionSet {
            name: "graphql".into(),
            version: "14.0.3".into(),
            locations: vec![PathBuf::from("/ws"), PathBuf::from("/ws/packages/core")],
        };
        assert_eq!(
            render("Set", &result),
            "Set graphql to 14.0.3 in 2 manifest(s)\n  /ws\n  /ws/packages/core"
        );
    }

    #[tokio::test]
    async fn bump_command_rejects_unknown_release() {
        let ctx = ServiceContext::in_memory(example_fs());
        let err =
            run_bump(&ctx, &Config::new(ROOT), "graphql", "sideways", None).await.unwrap_err();
        assert_eq!(err, "failed to bump 'graphql' by 'sideways'");
    }

    #[tokio::test]
    async fn set_command_writes_every_consumer() {
        let fs = example_fs();
        let ctx = ServiceContext::in_memory(fs.clone());

        run(&ctx, &Config::new(ROOT), "graphql", "14.0.3").await.unwrap();

        assert_eq!(fs.total_writes(), 4);
    }
}
