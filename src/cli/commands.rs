//! CLI command definitions

use clap::Args;

/// Run the pipeline
#[derive(Debug, Args, Clone, Default)]
pub struct RunCommand {
    /// Skip the confirmation prompt and any per-step confirmations
    #[arg(short, long)]
    pub yes: bool,

    /// Seconds between container-engine readiness probes
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Maximum number of readiness probes before giving up
    #[arg(long, value_name = "N")]
    pub poll_attempts: Option<u32>,
}

/// Show the pipeline without executing it
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
