//! Workspace dependency manager behind the `lockstep` CLI.
//!
//! Discovers the packages of a multi-package JavaScript workspace, builds a
//! graph of who depends on what, and keeps every declaration of a name at the
//! same version. The library surface lives in [`ops`]; [`commands`] renders
//! its results for the terminal.

pub mod adapters;
pub mod changes;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod hooks;
pub mod integrity;
pub mod manifest;
pub mod ops;
pub mod ports;
pub mod registry;
pub mod resolve;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// Help and version requests print their text and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["lockstep", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_and_version_succeed() {
        assert!(run(["lockstep", "--help"]).is_ok());
        assert!(run(["lockstep", "--version"]).is_ok());
        assert!(run(["lockstep", "check", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_missing_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().join("absent");
        let result = run(["lockstep", "check", "--cwd", cwd.to_str().unwrap()]);
        assert!(result.is_err());
    }
}
