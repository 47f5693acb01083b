//! Scripted shell adapter for tests.

use std::collections::HashMap;
use std::future::ready;
use std::sync::Mutex;

use crate::error::PortError;
use crate::ports::shell::{ShellCommand, ShellExecutor, ShellFuture, ShellOutput};

/// Returns canned output per program name and records every invocation.
///
/// Programs without a script fail to "spawn".
#[derive(Default)]
pub struct ScriptedShell {
    scripts: HashMap<String, ShellOutput>,
    invocations: Mutex<Vec<ShellCommand>>,
}

impl ScriptedShell {
    /// Creates a shell with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful run of `program` printing `stdout`.
    #[must_use]
    pub fn with_output(self, program: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.with_result(
            program,
            ShellOutput { exit_code: 0, stdout: stdout.into(), stderr: String::new() },
        )
    }

    /// Scripts an arbitrary result for `program`.
    #[must_use]
    pub fn with_result(mut self, program: impl Into<String>, output: ShellOutput) -> Self {
        self.scripts.insert(program.into(), output);
        self
    }

    /// Commands run so far, in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<ShellCommand> {
        self.invocations.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl ShellExecutor for ScriptedShell {
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ShellFuture<'a> {
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(command.clone());
        }
        let result: Result<ShellOutput, PortError> = self
            .scripts
            .get(&command.program)
            .cloned()
            .ok_or_else(|| format!("program not found: {}", command.program).into());
        Box::pin(ready(result))
    }
}
