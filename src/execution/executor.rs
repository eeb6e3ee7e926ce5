//! Step executor - maps each step kind onto its shell commands

use crate::core::{StackConfig, StepKind};
use crate::discovery::{self, DiscoveryError};
use crate::execution::readiness::{ReadinessError, ReadinessProbe};
use crate::shell::{command, ShellError, ShellExecutor};
use thiserror::Error;
use tracing::{info, warn};

/// How per-step confirmations (currently only the dump restore) are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    /// Prompt the operator on stdin
    Interactive,
    /// Answer yes to everything (`--yes`)
    Always,
}

/// Result of executing a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step ran its commands
    Completed,
    /// Step had nothing to do
    Skipped { reason: String },
}

/// Error from executing a step; any of these aborts the pipeline.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Executes a single step against the shell.
pub struct StepExecutor<S> {
    shell: S,
    config: StackConfig,
    approval: Approval,
}

impl<S: ShellExecutor> StepExecutor<S> {
    pub fn new(shell: S, config: StackConfig, approval: Approval) -> Self {
        Self {
            shell,
            config,
            approval,
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Execute one step to completion.
    pub async fn execute(&self, kind: StepKind) -> Result<StepOutcome, StepError> {
        info!("executing step: {kind}");

        match kind {
            StepKind::KillContainers => self.fire(&command::kill_all_containers()).await,
            StepKind::RebuildDb => self.rebuild_db().await,
            StepKind::MakeMigrations => self.manage_py("makemigrations").await,
            StepKind::Migrate => self.manage_py("migrate").await,
            StepKind::LoadFixtures => self.load_fixtures().await,
            StepKind::RunTests => self.manage_py("test").await,
            StepKind::CreateSuperuser => self.manage_py("createsuperuser").await,
            StepKind::LoadLastDump => self.load_last_dump().await,
            StepKind::InstallRequirements => {
                self.fire(&command::build_services(&self.config.build_services))
                    .await
            }
            StepKind::InstallRequirementsLocal => {
                self.fire(&command::install_requirements_local()).await
            }
            StepKind::DeleteMigrations => self.delete_migrations(),
            StepKind::CleanSpace => self.fire(&command::clean_space()).await,
            StepKind::StartProject => {
                self.fire(&command::make(&self.config.start_target)).await
            }
        }
    }

    /// Fire-and-forget shell command.
    async fn fire(&self, line: &str) -> Result<StepOutcome, StepError> {
        self.shell.run(line).await?;
        Ok(StepOutcome::Completed)
    }

    /// manage.py invocation proxied through the backend container.
    async fn manage_py(&self, args: &str) -> Result<StepOutcome, StepError> {
        self.fire(&command::manage_py(&self.config.backend_service, args))
            .await
    }

    async fn rebuild_db(&self) -> Result<StepOutcome, StepError> {
        let probe = ReadinessProbe::new(
            &self.shell,
            self.config.poll_interval,
            self.config.max_poll_attempts,
        );
        probe.rebuild_database(&self.config).await?;
        Ok(StepOutcome::Completed)
    }

    async fn load_fixtures(&self) -> Result<StepOutcome, StepError> {
        let fixtures = discovery::fixture_files(&self.config.project_root)?;
        if fixtures.is_empty() {
            // Bare `loaddata` is a usage error, so there is nothing to run.
            warn!("no fixture files found");
            return Ok(StepOutcome::Skipped {
                reason: "no fixture files found".to_string(),
            });
        }

        self.manage_py(&format!("loaddata {}", fixtures.join(" ")))
            .await
    }

    async fn load_last_dump(&self) -> Result<StepOutcome, StepError> {
        self.shell
            .run(&command::start_service(&self.config.db_service))
            .await?;

        let dump = match discovery::latest_dump(&self.config.project_root)? {
            Some(dump) => dump,
            None => {
                return Ok(StepOutcome::Skipped {
                    reason: "no dumps to load".to_string(),
                })
            }
        };

        let dump_display = dump.display().to_string();
        if !self.approved(&format!("Load this dump?\n{dump_display}")) {
            return Ok(StepOutcome::Skipped {
                reason: "dump restore declined".to_string(),
            });
        }

        self.fire(&command::load_dump(
            &self.config.backend_service,
            &self.config.database,
            &dump_display,
        ))
        .await
    }

    fn delete_migrations(&self) -> Result<StepOutcome, StepError> {
        let removed = discovery::delete_migrations(&self.config.apps_dir)?;
        info!("removed {} migration file(s)", removed.len());
        Ok(StepOutcome::Completed)
    }

    fn approved(&self, prompt: &str) -> bool {
        match self.approval {
            Approval::Always => true,
            Approval::Interactive => crate::cli::confirm::ask(prompt).unwrap_or(false),
        }
    }
}
