//! Shell executor port for running external programs.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::error::PortError;

/// Boxed future returned by [`ShellExecutor::run`].
pub type ShellFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ShellOutput, PortError>> + Send + 'a>>;

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Program to execute (resolved through `PATH` when not a path).
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory for the process.
    pub cwd: PathBuf,
    /// Data written to the process's standard input, if any.
    pub stdin: Option<String>,
}

impl ShellCommand {
    /// Creates a command with no arguments and no stdin.
    #[must_use]
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: cwd.into(), stdin: None }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the data piped to standard input.
    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

/// The output of a finished process.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external programs.
///
/// Used for workspace discovery through a package-manager CLI and for
/// running change hooks.
pub trait ShellExecutor: Send + Sync {
    /// Runs the command to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or awaited.
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ShellFuture<'a>;
}
