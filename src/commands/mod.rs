//! Command dispatch and handlers.

pub mod add;
pub mod check;
pub mod get;
pub mod remove;
pub mod set;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command line to its handler.
///
/// Loads the layered configuration, wires the live adapters, and drives the
/// handler on a single-threaded runtime.
///
/// # Errors
///
/// Returns an error string if configuration fails or the handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = Config::load(cli.overrides()).map_err(|e| e.to_string())?;
    tracing::debug!(cwd = %config.cwd.display(), registry = %config.registry_url, "loaded config");
    let ctx = ServiceContext::live(&config);
    dispatch_with_context(&cli.command, &ctx, &config)
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    runtime.block_on(async {
        match command {
            Command::Add { name, version, dev, parent } => {
                add::run(ctx, config, name, version.as_deref(), *dev, parent.as_deref()).await
            }
            Command::Remove { name, parent } => {
                remove::run(ctx, config, name, parent.as_deref()).await
            }
            Command::Set { name, version } => set::run(ctx, config, name, version).await,
            Command::Bump { name, release, preid } => {
                set::run_bump(ctx, config, name, release, preid.as_deref()).await
            }
            Command::Get { name } => get::run(ctx, config, name).await,
            Command::Check { name } => check::run(ctx, config, name.as_deref()).await,
        }
    })
}

/// Lays out rows under a header, columns separated by two spaces.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter().filter_map(|row| row.get(i)).map(String::len).fold(header.len(), usize::max)
        })
        .collect();

    let mut lines = vec![table_line(headers, &widths)];
    lines.push(widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("  "));
    lines.extend(rows.iter().map(|row| table_line(row.as_slice(), &widths)));
    lines.join("\n")
}

fn table_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    padded.join("  ").trim_end().to_string()
}
