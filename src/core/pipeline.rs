//! Pipeline domain model

use crate::core::{
    state::{ExecutionStatus, PipelineState, StepState},
    step::{StepKind, UnknownStep},
};
use serde::Serialize;

/// A step together with its runtime state.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub kind: StepKind,
    pub state: StepState,
}

/// The ordered sequence of steps for one run.
///
/// The sequence is fixed at construction and consumed top to bottom; there
/// is no dependency graph and no reordering at runtime.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline name, for display
    pub name: String,

    /// Steps in execution order
    steps: Vec<StepRecord>,

    /// Execution state
    pub state: PipelineState,
}

impl Pipeline {
    /// The stock pipeline: tear down, rebuild the database, migrate,
    /// load fixtures, start the project.
    pub const DEFAULT_STEPS: &'static [StepKind] = &[
        StepKind::KillContainers,
        StepKind::RebuildDb,
        StepKind::Migrate,
        StepKind::LoadFixtures,
        StepKind::StartProject,
    ];

    /// Build a pipeline from an explicit ordered step list.
    pub fn new(name: impl Into<String>, kinds: &[StepKind]) -> Self {
        let steps = kinds
            .iter()
            .map(|&kind| StepRecord {
                kind,
                state: StepState::Pending,
            })
            .collect();

        Pipeline {
            name: name.into(),
            steps,
            state: PipelineState::new(),
        }
    }

    /// The stock five-step pipeline.
    pub fn default_stack() -> Self {
        Self::new("local-stack", Self::DEFAULT_STEPS)
    }

    /// Build a pipeline from textual step names, rejecting unknown names
    /// before anything runs.
    pub fn from_names(
        name: impl Into<String>,
        step_names: &[String],
    ) -> Result<Self, UnknownStep> {
        let kinds = step_names
            .iter()
            .map(|s| s.parse::<StepKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, &kinds))
    }

    /// The ordered step kinds.
    pub fn step_kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// All step records in execution order.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// The record for a step at a position in the run order.
    pub fn step_at(&self, index: usize) -> Option<&StepRecord> {
        self.steps.get(index)
    }

    /// Mutable record for a step at a position in the run order.
    pub fn step_at_mut(&mut self, index: usize) -> Option<&mut StepRecord> {
        self.steps.get_mut(index)
    }

    /// Check if every step reached a terminal state.
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.state.is_terminal())
    }

    /// Check if the pipeline has failed.
    pub fn has_failed(&self) -> bool {
        self.state.status == ExecutionStatus::Failed
    }

    /// Recompute completion counts from step states.
    pub fn update_counts(&mut self) {
        let mut completed = 0;
        let mut skipped = 0;
        let mut failed = 0;

        for step in &self.steps {
            match step.state {
                StepState::Completed { .. } => completed += 1,
                StepState::Skipped { .. } => skipped += 1,
                StepState::Failed { .. } => failed += 1,
                _ => {}
            }
        }

        self.state.total_steps = self.steps.len();
        self.state.completed_steps = completed;
        self.state.skipped_steps = skipped;
        self.state.failed_steps = failed;
    }

    /// A serializable view of the planned steps, for `plan --json`.
    pub fn plan(&self) -> PipelinePlan {
        PipelinePlan {
            name: self.name.clone(),
            steps: self
                .steps
                .iter()
                .map(|s| PlanStep {
                    step: s.kind,
                    description: s.kind.description(),
                })
                .collect(),
        }
    }
}

/// Serializable plan of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePlan {
    pub name: String,
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanStep {
    pub step: StepKind,
    pub description: &'static str,
}
