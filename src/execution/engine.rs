//! Main execution engine - runs the pipeline top to bottom

use crate::core::{ExecutionStatus, Pipeline, StepKind, StepState};
use crate::execution::{StepError, StepExecutor, StepOutcome};
use crate::shell::ShellExecutor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
    },
    StepStarted {
        step: StepKind,
    },
    StepCompleted {
        step: StepKind,
    },
    StepSkipped {
        step: StepKind,
        reason: String,
    },
    StepFailed {
        step: StepKind,
        error: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Error aborting a pipeline run.
#[derive(Debug, Error)]
#[error("step {step} failed: {source}")]
pub struct PipelineError {
    pub step: StepKind,
    #[source]
    pub source: StepError,
}

/// Runs every step of a pipeline strictly in order, stopping at the
/// first failure. There is no retry and no rollback; the external
/// container and database state is mutated with no undo path.
pub struct ExecutionEngine<S> {
    executor: StepExecutor<S>,
    event_handlers: Vec<EventHandler>,
}

impl<S: ShellExecutor> ExecutionEngine<S> {
    pub fn new(executor: StepExecutor<S>) -> Self {
        Self {
            executor,
            event_handlers: Vec::new(),
        }
    }

    /// Register an event handler. Handlers must be attached before
    /// `execute` is called.
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the entire pipeline, fail-fast.
    pub async fn execute(&self, pipeline: &mut Pipeline) -> Result<(), PipelineError> {
        let execution_id = pipeline.state.execution_id;
        info!(
            "starting pipeline: {} ({execution_id})",
            pipeline.name
        );
        self.emit(ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name: pipeline.name.clone(),
        });

        pipeline.state.start(pipeline.steps().len());

        for index in 0..pipeline.steps().len() {
            let kind = pipeline.step_at(index).map(|s| s.kind);
            let Some(kind) = kind else { break };

            let started_at = chrono::Utc::now();
            if let Some(record) = pipeline.step_at_mut(index) {
                record.state = StepState::Running { started_at };
            }
            self.emit(ExecutionEvent::StepStarted { step: kind });

            match self.executor.execute(kind).await {
                Ok(StepOutcome::Completed) => {
                    if let Some(record) = pipeline.step_at_mut(index) {
                        record.state = StepState::Completed {
                            started_at,
                            completed_at: chrono::Utc::now(),
                        };
                    }
                    pipeline.update_counts();
                    self.emit(ExecutionEvent::StepCompleted { step: kind });
                }
                Ok(StepOutcome::Skipped { reason }) => {
                    if let Some(record) = pipeline.step_at_mut(index) {
                        record.state = StepState::Skipped {
                            reason: reason.clone(),
                        };
                    }
                    pipeline.update_counts();
                    self.emit(ExecutionEvent::StepSkipped { step: kind, reason });
                }
                Err(source) => {
                    error!("step {kind} failed: {source}");
                    if let Some(record) = pipeline.step_at_mut(index) {
                        record.state = StepState::Failed {
                            error: source.to_string(),
                            failed_at: chrono::Utc::now(),
                        };
                    }
                    pipeline.update_counts();
                    pipeline.state.fail();
                    self.emit(ExecutionEvent::StepFailed {
                        step: kind,
                        error: source.to_string(),
                    });
                    self.emit(ExecutionEvent::PipelineCompleted {
                        execution_id,
                        status: ExecutionStatus::Failed,
                    });
                    return Err(PipelineError { step: kind, source });
                }
            }
        }

        pipeline.state.complete();
        info!("pipeline finished: {}", pipeline.name);
        self.emit(ExecutionEvent::PipelineCompleted {
            execution_id,
            status: ExecutionStatus::Completed,
        });

        Ok(())
    }
}
