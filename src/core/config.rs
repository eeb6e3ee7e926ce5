//! Stack configuration
//!
//! Service names, the database name, and the poller parameters all live
//! here with in-source defaults; the pipeline itself is not configurable
//! at runtime beyond the ordered step list.

use std::path::PathBuf;
use std::time::Duration;

/// Hard ceiling on the readiness poll attempt count, to keep the wait
/// killable even with an absurd override.
pub const MAX_POLL_ATTEMPTS_CEILING: u32 = 10_000;

/// Names and knobs for the containerized stack.
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// docker-compose service running the database
    pub db_service: String,

    /// docker-compose service running the Django backend
    pub backend_service: String,

    /// Name of the database dropped and recreated by rebuild_db
    pub database: String,

    /// Services rebuilt by install_requirements
    pub build_services: Vec<String>,

    /// Directory holding the Django apps (for delete_migrations)
    pub apps_dir: PathBuf,

    /// Root searched for fixtures/ directories and the dumps/ directory
    pub project_root: PathBuf,

    /// make target used by start_project
    pub start_target: String,

    /// Sleep between `docker ps` probes while the engine restarts
    pub poll_interval: Duration,

    /// Upper bound on `docker ps` probes before giving up
    pub max_poll_attempts: u32,
}

impl StackConfig {
    /// Clamp an attempt override to the documented ceiling.
    pub fn with_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts.min(MAX_POLL_ATTEMPTS_CEILING).max(1);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            db_service: "postgres".to_string(),
            backend_service: "django".to_string(),
            database: "database".to_string(),
            build_services: vec!["django".to_string(), "celery".to_string()],
            apps_dir: PathBuf::from("packages/django/server/apps"),
            project_root: PathBuf::from("."),
            start_target: "application-dev".to_string(),
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 120,
        }
    }
}
