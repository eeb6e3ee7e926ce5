//! Shell command execution

pub mod command;
pub mod result;
pub mod system;

use async_trait::async_trait;
pub use result::{CommandOutput, ShellError};
pub use system::SystemShell;

/// Trait for shell execution - allows tests to script command outcomes.
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    /// Run a command with the terminal inherited, ignoring its exit status.
    async fn run(&self, command: &str) -> Result<(), ShellError>;

    /// Run a command and capture its stdout/stderr for inspection.
    async fn capture(&self, command: &str) -> Result<CommandOutput, ShellError>;
}
