//! Live shell executor using `tokio::process::Command`.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::PortError;
use crate::ports::shell::{ShellCommand, ShellExecutor, ShellFuture, ShellOutput};

/// Live shell executor that spawns real processes.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ShellFuture<'a> {
        Box::pin(spawn(command))
    }
}

async fn spawn(command: &ShellCommand) -> Result<ShellOutput, PortError> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.cwd)
        .stdin(if command.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let (Some(input), Some(mut stdin)) = (&command.stdin, child.stdin.take()) {
        stdin.write_all(input.as_bytes()).await?;
        // Closing stdin lets the child see EOF.
        drop(stdin);
    }

    let output = child.wait_with_output().await?;
    Ok(ShellOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_echo_command() {
        let command = ShellCommand::new("echo", std::env::temp_dir()).args(["hello"]);
        let result = LiveShellExecutor.run(&command).await.unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn pipes_stdin() {
        let command = ShellCommand::new("cat", std::env::temp_dir()).stdin("piped");
        let result = LiveShellExecutor.run(&command).await.unwrap();

        assert_eq!(result.stdout, "piped");
    }

    #[tokio::test]
    async fn captures_exit_code() {
        let command = ShellCommand::new("sh", std::env::temp_dir()).args(["-c", "exit 42"]);
        let result = LiveShellExecutor.run(&command).await.unwrap();

        assert_eq!(result.exit_code, 42);
        assert!(!result.success());
    }
}
