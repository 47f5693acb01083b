//! `lockstep get` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::graph::DependencyRecord;
use crate::ops::{self, VersionInfo};

use super::render_table;

/// Execute the `get` command.
///
/// Prints the single version in use, or a table of every declaration when
/// the workspace disagrees.
///
/// # Errors
///
/// Returns an error string if the package is unknown.
pub async fn run(ctx: &ServiceContext, config: &Config, name: &str) -> Result<(), String> {
    match ops::get(ctx, config, name).await.map_err(|e| e.to_string())? {
        VersionInfo::Consistent(version) => println!("{version}"),
        VersionInfo::Drifted(record) => {
            println!("{name} is declared at more than one version:\n");
            println!("{}", consumers_table(&record));
        }
    }
    Ok(())
}

/// One row per consumer: direct, dev, and peer versions.
pub(crate) fn consumers_table(record: &DependencyRecord) -> String {
    let cell = |version: Option<&str>| version.unwrap_or("-").to_string();
    let rows: Vec<Vec<String>> = record
        .iter()
        .map(|(consumer, declaration)| {
            vec![
                consumer.clone(),
                cell(declaration.direct.as_deref()),
                cell(declaration.dev.as_deref()),
                cell(declaration.peer.as_deref()),
            ]
        })
        .collect();
    render_table(&["CONSUMER", "DIRECT", "DEV", "PEER"], &rows)
}
