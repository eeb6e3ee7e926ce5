//! Pipeline execution engine

pub mod engine;
pub mod executor;
pub mod readiness;

pub use engine::{EventHandler, ExecutionEngine, ExecutionEvent, PipelineError};
pub use executor::{Approval, StepError, StepExecutor, StepOutcome};
pub use readiness::{ReadinessError, ReadinessProbe, Rebuilt, STARTING_UP_MESSAGE};
