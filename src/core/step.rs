//! Step domain model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of pipeline steps.
///
/// Dispatch is by enum variant rather than by name lookup, so an unknown
/// step identifier can only appear at parse time, never mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Kill every running container
    KillContainers,
    /// Drop and recreate the database, waiting out a slow engine start
    RebuildDb,
    /// Generate Django migrations inside the backend container
    MakeMigrations,
    /// Apply migrations
    Migrate,
    /// Load every discovered fixture file
    LoadFixtures,
    /// Run the backend test suite
    RunTests,
    /// Create a Django superuser interactively
    CreateSuperuser,
    /// Restore the most recent SQL dump
    LoadLastDump,
    /// Rebuild the backend/worker images
    InstallRequirements,
    /// Install backend requirements into the local virtualenv
    InstallRequirementsLocal,
    /// Delete generated migration files from every app
    DeleteMigrations,
    /// Prune containers, images, volumes, builders and networks
    CleanSpace,
    /// Start the project via make
    StartProject,
}

impl StepKind {
    /// All known steps, in a stable display order.
    pub const ALL: &'static [StepKind] = &[
        StepKind::KillContainers,
        StepKind::RebuildDb,
        StepKind::MakeMigrations,
        StepKind::Migrate,
        StepKind::LoadFixtures,
        StepKind::RunTests,
        StepKind::CreateSuperuser,
        StepKind::LoadLastDump,
        StepKind::InstallRequirements,
        StepKind::InstallRequirementsLocal,
        StepKind::DeleteMigrations,
        StepKind::CleanSpace,
        StepKind::StartProject,
    ];

    /// The snake_case identifier used on the command line and in plans.
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::KillContainers => "kill_containers",
            StepKind::RebuildDb => "rebuild_db",
            StepKind::MakeMigrations => "make_migrations",
            StepKind::Migrate => "migrate",
            StepKind::LoadFixtures => "load_fixtures",
            StepKind::RunTests => "run_tests",
            StepKind::CreateSuperuser => "create_superuser",
            StepKind::LoadLastDump => "load_last_dump",
            StepKind::InstallRequirements => "install_requirements",
            StepKind::InstallRequirementsLocal => "install_requirements_local",
            StepKind::DeleteMigrations => "delete_migrations",
            StepKind::CleanSpace => "clean_space",
            StepKind::StartProject => "start_project",
        }
    }

    /// One-line description for `stackctl steps`.
    pub fn description(&self) -> &'static str {
        match self {
            StepKind::KillContainers => "kill all running containers",
            StepKind::RebuildDb => "drop and recreate the database, polling until the engine is up",
            StepKind::MakeMigrations => "generate Django migrations in the backend container",
            StepKind::Migrate => "apply Django migrations",
            StepKind::LoadFixtures => "load every *.json fixture found under fixtures/ directories",
            StepKind::RunTests => "run the backend test suite",
            StepKind::CreateSuperuser => "create a Django superuser",
            StepKind::LoadLastDump => "restore the most recently created dump from dumps/",
            StepKind::InstallRequirements => "rebuild the backend and worker images",
            StepKind::InstallRequirementsLocal => "pip install requirements into the local venv",
            StepKind::DeleteMigrations => "delete generated migration files from every app",
            StepKind::CleanSpace => "prune containers, images, volumes, builders and networks",
            StepKind::StartProject => "start the project (make)",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized step identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown step '{0}'")]
pub struct UnknownStep(pub String);

impl FromStr for StepKind {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}
