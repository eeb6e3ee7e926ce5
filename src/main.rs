use anyhow::{Context, Result};
use stackctl::cli::commands::{PlanCommand, RunCommand};
use stackctl::cli::output::*;
use stackctl::cli::{confirm, Cli, Command};
use stackctl::core::{Pipeline, StackConfig, StepKind};
use stackctl::execution::{Approval, ExecutionEngine, StepExecutor};
use stackctl::shell::SystemShell;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // A bare invocation runs the full pipeline.
    match cli.command.unwrap_or(Command::Run(RunCommand::default())) {
        Command::Run(cmd) => run_pipeline(&cmd).await?,
        Command::Plan(cmd) => plan_pipeline(&cmd)?,
        Command::Steps => list_steps(),
    }

    Ok(())
}

async fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let mut config = StackConfig::default();
    if let Some(secs) = cmd.poll_interval {
        config = config.with_poll_interval(Duration::from_secs(secs));
    }
    if let Some(attempts) = cmd.poll_attempts {
        config = config.with_poll_attempts(attempts);
    }

    let mut pipeline = Pipeline::default_stack();

    // Confirm intent before anything touches containers or the database.
    if cmd.yes {
        println!(
            "{} Running pipeline without confirmation (--yes):\n{}\n",
            INFO,
            format_pipeline_listing(&pipeline)
        );
    } else {
        let confirmed = confirm::ask(&format!(
            "Are you sure you want to continue?\n\nPipeline:\n{}\n",
            format_pipeline_listing(&pipeline)
        ))?;
        if !confirmed {
            println!("{} Aborted; no steps were executed", INFO);
            return Ok(());
        }
    }

    let approval = if cmd.yes {
        Approval::Always
    } else {
        Approval::Interactive
    };
    let executor = StepExecutor::new(SystemShell::new(), config, approval);
    let mut engine = ExecutionEngine::new(executor);
    engine.add_event_handler(|event| {
        println!("{}", format_execution_event(event));
    });

    println!();
    let result = engine.execute(&mut pipeline).await;

    match result {
        Ok(()) => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(&pipeline.name).bold(),
                style("successfully").green()
            );
            Ok(())
        }
        Err(err) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&pipeline.name).bold(),
                style("failed").red()
            );
            Err(err.into())
        }
    }
}

fn plan_pipeline(cmd: &PlanCommand) -> Result<()> {
    let pipeline = Pipeline::default_stack();
    let plan = pipeline.plan();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("{} Pipeline: {}", INFO, style(&plan.name).bold());
    for step in &plan.steps {
        println!(
            "  {} {}",
            style(step.step).cyan(),
            style(step.description).dim()
        );
    }
    Ok(())
}

fn list_steps() {
    println!("{} Known steps:", INFO);
    for kind in StepKind::ALL {
        println!(
            "  {} {}",
            style(kind).cyan(),
            style(kind.description()).dim()
        );
    }
}
