//! System shell executor - runs command lines through `sh -c`

use crate::shell::{CommandOutput, ShellError, ShellExecutor};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Executor backed by the system shell.
///
/// Every invocation goes through `sh -c`, blocking until the child has
/// exited. `run` inherits the terminal so the operator sees raw command
/// output; `capture` pipes stdout/stderr for inspection.
#[derive(Debug, Clone, Default)]
pub struct SystemShell;

impl SystemShell {
    pub fn new() -> Self {
        Self
    }

    fn base_command(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ShellExecutor for SystemShell {
    async fn run(&self, command: &str) -> Result<(), ShellError> {
        info!("$ {command}");

        let status = Self::base_command(command)
            .status()
            .await
            .map_err(|source| ShellError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            // Fire-and-forget call sites never escalate a bad exit.
            warn!("command exited with {status}: {command}");
        }

        Ok(())
    }

    async fn capture(&self, command: &str) -> Result<CommandOutput, ShellError> {
        info!("$ {command}");

        let output = Self::base_command(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ShellError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(
            code = output.status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "captured command output"
        );

        Ok(CommandOutput::new(stdout, stderr, output.status.code()))
    }
}
