//! Shell invocation results

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for shell execution
///
/// A non-zero exit from the child is deliberately not an error: most
/// call sites are fire-and-forget and decide readiness from the captured
/// output. Only failing to run the shell at all is a fault here.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to spawn shell for `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Captured output of one command invocation.
///
/// Ephemeral: exists only for the duration of one executor call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Captured stdout, lossily decoded
    pub stdout: String,

    /// Captured stderr, lossily decoded
    pub stderr: String,

    /// Exit code, if the process exited normally
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            code,
        }
    }

    /// Stdout with surrounding whitespace removed, the form every
    /// inspection site compares against.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Stderr with surrounding whitespace removed.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}
