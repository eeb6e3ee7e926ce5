//! Test utility functions for stackctl

#![allow(dead_code)]

use async_trait::async_trait;
use stackctl::shell::{CommandOutput, ShellError, ShellExecutor};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// How a command was invoked on the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Run,
    Capture,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,
    pub command: String,
}

#[derive(Default)]
struct Inner {
    /// Scripted capture outputs, consumed FIFO per command line
    outputs: Mutex<HashMap<String, VecDeque<CommandOutput>>>,
    /// Commands that should fail to spawn
    failures: Mutex<HashSet<String>>,
    /// Every invocation, in order
    log: Mutex<Vec<Invocation>>,
}

/// Mock shell that records invocations and replays scripted outputs.
///
/// Captures for unscripted commands return empty output with exit 0.
/// Clones share state, so a clone kept by the test can inspect the log
/// after the executor consumed the original.
#[derive(Clone, Default)]
pub struct MockShell {
    inner: Arc<Inner>,
}

impl MockShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a captured output for the given command line.
    pub fn script(&self, command: &str, output: CommandOutput) {
        self.inner
            .outputs
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
    }

    /// Queue a stdout-only captured output with exit 0.
    pub fn script_stdout(&self, command: &str, stdout: &str) {
        self.script(command, CommandOutput::new(stdout, "", Some(0)));
    }

    /// Make the given command line fail to spawn.
    pub fn fail_on(&self, command: &str) {
        self.inner
            .failures
            .lock()
            .unwrap()
            .insert(command.to_string());
    }

    /// Every command line invoked, in order, regardless of mode.
    pub fn commands(&self) -> Vec<String> {
        self.inner
            .log
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.command.clone())
            .collect()
    }

    /// The full invocation log.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.log.lock().unwrap().clone()
    }

    fn record(&self, mode: Mode, command: &str) {
        self.inner.log.lock().unwrap().push(Invocation {
            mode,
            command: command.to_string(),
        });
    }

    fn check_failure(&self, command: &str) -> Result<(), ShellError> {
        if self.inner.failures.lock().unwrap().contains(command) {
            return Err(ShellError::Internal(format!(
                "MockShell: scripted failure for `{command}`"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ShellExecutor for MockShell {
    async fn run(&self, command: &str) -> Result<(), ShellError> {
        self.record(Mode::Run, command);
        self.check_failure(command)
    }

    async fn capture(&self, command: &str) -> Result<CommandOutput, ShellError> {
        self.record(Mode::Capture, command);
        self.check_failure(command)?;

        let output = self
            .inner
            .outputs
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(|queue| queue.pop_front());

        Ok(output.unwrap_or_else(|| CommandOutput::new("", "", Some(0))))
    }
}
