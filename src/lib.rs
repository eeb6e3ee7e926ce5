//! stackctl - local development stack orchestrator

pub mod cli;
pub mod core;
pub mod discovery;
pub mod execution;
pub mod shell;

// Re-export commonly used types
pub use crate::core::{ExecutionStatus, Pipeline, StackConfig, StepKind, StepState};
pub use crate::execution::{
    Approval, ExecutionEngine, ExecutionEvent, PipelineError, StepExecutor, StepOutcome,
};
pub use crate::shell::{CommandOutput, ShellError, ShellExecutor, SystemShell};
