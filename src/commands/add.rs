//! `lockstep add` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::manifest::DependencyKind;
use crate::ops::{self, AddRequest, Added};

/// Execute the `add` command.
///
/// # Errors
///
/// Returns an error string if the dependency cannot be added.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    version: Option<&str>,
    dev: bool,
    parent: Option<&str>,
) -> Result<(), String> {
    let request = AddRequest {
        name: name.to_string(),
        version: version.map(str::to_string),
        parent: parent.map(str::to_string),
        kind: if dev { DependencyKind::Dev } else { DependencyKind::Direct },
    };
    let added = ops::add(ctx, config, &request).await.map_err(|e| e.to_string())?;
    println!("{}", render(&added));
    Ok(())
}

fn render(added: &Added) -> String {
    format!(
        "Added {}@{} to {} of {} ({})",
        added.name,
        added.version,
        added.kind.field(),
        added.parent,
        added.location.display()
    )
}
