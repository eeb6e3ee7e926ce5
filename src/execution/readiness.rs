//! Database readiness probe for the rebuild step.
//!
//! Flow: `Starting → Checking → {Ready, Restarting}`. The database
//! container is started and the drop-and-recreate command issued; if psql
//! reports that the engine is still starting up, the container engine is
//! restarted and `docker ps` polled on a fixed interval until it responds,
//! after which the start/reset pair is re-issued once.

use crate::core::StackConfig;
use crate::shell::{command, ShellError, ShellExecutor};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Exact message psql prints while the database engine is still booting.
pub const STARTING_UP_MESSAGE: &str = "psql: FATAL:  the database system is starting up";

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("container engine did not respond after {attempts} probes")]
    EngineTimeout { attempts: u32 },

    #[error("database still starting up after engine restart")]
    DatabaseStillStarting,
}

/// How the rebuild concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuilt {
    /// The reset landed on the first check.
    FirstTry,
    /// The engine had to be restarted before the reset landed.
    AfterRestart,
}

/// Drives the database rebuild, including the slow-engine recovery path.
pub struct ReadinessProbe<'a, S> {
    shell: &'a S,
    interval: Duration,
    max_attempts: u32,
}

impl<'a, S: ShellExecutor> ReadinessProbe<'a, S> {
    pub fn new(shell: &'a S, interval: Duration, max_attempts: u32) -> Self {
        Self {
            shell,
            interval,
            max_attempts,
        }
    }

    /// Rebuild the database, waiting out a slow engine start if needed.
    pub async fn rebuild_database(&self, config: &StackConfig) -> Result<Rebuilt, ReadinessError> {
        let start = command::start_service(&config.db_service);
        let reset = command::reset_database(&config.db_service, &config.database);

        if self.issue_reset(&start, &reset).await? {
            info!("database rebuilt");
            return Ok(Rebuilt::FirstTry);
        }

        warn!("database engine still starting up; restarting the container engine");
        self.shell.run(&command::restart_container_engine()).await?;
        self.wait_for_engine().await?;

        // One retry of the start/reset pair after the engine comes back;
        // an unready database after the retry is surfaced as an error
        // rather than silently stopping.
        if self.issue_reset(&start, &reset).await? {
            info!("database rebuilt after engine restart");
            Ok(Rebuilt::AfterRestart)
        } else {
            Err(ReadinessError::DatabaseStillStarting)
        }
    }

    /// Start the db container and issue the reset; true when the reset
    /// output shows the engine is up.
    async fn issue_reset(&self, start: &str, reset: &str) -> Result<bool, ReadinessError> {
        self.shell.run(start).await?;
        let output = self.shell.capture(reset).await?;
        let message = output.stdout_trimmed();

        if still_starting(message) {
            return Ok(false);
        }
        if !message.is_empty() {
            println!("{message}");
        }
        Ok(true)
    }

    /// Poll `docker ps` until it answers, bounded by `max_attempts`.
    async fn wait_for_engine(&self) -> Result<(), ReadinessError> {
        let probe = command::list_containers();

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.interval).await;

            let output = self.shell.capture(&probe).await?;
            if !output.stdout_trimmed().is_empty() && output.stderr_trimmed().is_empty() {
                info!("container engine responded after {attempt} probe(s)");
                return Ok(());
            }
            debug!(attempt, "container engine not ready");
        }

        Err(ReadinessError::EngineTimeout {
            attempts: self.max_attempts,
        })
    }
}

/// Any output other than the exact starting-up sentinel counts as ready.
fn still_starting(stdout: &str) -> bool {
    stdout == STARTING_UP_MESSAGE
}
