//! `lockstep check` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::integrity::IntegrityReport;
use crate::ops;

use super::render_table;

/// Execute the `check` command.
///
/// Prints one row per checked name. Drift is reported after the table and
/// makes the command fail.
///
/// # Errors
///
/// Returns an error string if the workspace cannot be loaded, the name is
/// unknown, or any name is declared at more than one version.
pub async fn run(ctx: &ServiceContext, config: &Config, name: Option<&str>) -> Result<(), String> {
    let report = ops::check(ctx, config, name).await.map_err(|e| e.to_string())?;
    println!("{}", render(&report));
    report.ensure_healthy().map_err(|e| e.to_string())
}

fn render(report: &IntegrityReport) -> String {
    let rows: Vec<Vec<String>> = report
        .iter()
        .map(|(name, result)| {
            let status = if result.integrity { "ok" } else { "drift" };
            vec![name.to_string(), status.to_string(), result.versions().join(", ")]
        })
        .collect();
    let healthy = report.iter().filter(|(_, result)| result.integrity).count();
    format!(
        "{}\n\n{healthy} of {} package(s) consistent.",
        render_table(&["NAME", "STATUS", "VERSIONS"], &rows),
        report.len()
    )
}
