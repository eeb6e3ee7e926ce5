//! Command-line interface

pub mod commands;
pub mod confirm;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{PlanCommand, RunCommand};

/// Local development stack orchestrator
#[derive(Debug, Parser, Clone)]
#[command(name = "stackctl")]
#[command(author = "stackctl Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Reset and start a containerized development stack", long_about = None)]
pub struct Cli {
    /// Defaults to `run` when no subcommand is given.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the pipeline (the default)
    Run(RunCommand),

    /// Show the pipeline without executing it
    Plan(PlanCommand),

    /// List every known step
    Steps,
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
