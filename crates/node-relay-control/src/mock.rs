//! Substitute command runner for tests.
//!
//! `MockCommandRunner` records every invocation instead of starting a
//! process, and returns scripted results per program.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::CommandError;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};

/// A single recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The program that was invoked.
    pub program: String,
    /// All arguments, fixed and per-call.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Always,
    Times(usize),
}

/// A command runner that records calls instead of running processes.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    calls: Mutex<Vec<Invocation>>,
    failures: Mutex<HashMap<String, Failure>>,
    stdout: Mutex<HashMap<String, String>>,
    delay: Mutex<Option<Duration>>,
    notify: Notify,
}

impl MockCommandRunner {
    /// Create a runner where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `program` exit with status 1.
    pub fn fail_program(&self, program: impl Into<String>) {
        self.failures.lock().insert(program.into(), Failure::Always);
    }

    /// Make the next `times` calls to `program` exit with status 1.
    pub fn fail_times(&self, program: impl Into<String>, times: usize) {
        self.failures
            .lock()
            .insert(program.into(), Failure::Times(times));
    }

    /// Set the standard output returned for `program`.
    pub fn set_stdout(&self, program: impl Into<String>, stdout: impl Into<String>) {
        self.stdout.lock().insert(program.into(), stdout.into());
    }

    /// Sleep for `delay` inside every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// All recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Recorded calls to `program` in order.
    #[must_use]
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.program == program)
            .cloned()
            .collect()
    }

    /// Wait until at least `count` calls have been recorded.
    ///
    /// Returns `false` if `timeout` expires first.
    pub async fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.calls.lock().len() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }

    fn should_fail(&self, program: &str) -> bool {
        let mut failures = self.failures.lock();
        match failures.get_mut(program) {
            Some(Failure::Always) => true,
            Some(Failure::Times(remaining)) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        extra_args: &[&str],
    ) -> Result<CommandOutput, CommandError> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let args = spec
            .args
            .iter()
            .cloned()
            .chain(extra_args.iter().map(|arg| (*arg).to_string()))
            .collect();
        self.calls.lock().push(Invocation {
            program: spec.program.clone(),
            args,
        });
        self.notify.notify_waiters();

        if self.should_fail(&spec.program) {
            return Err(CommandError::NonZeroExit {
                program: spec.program.clone(),
                code: Some(1),
                stderr: "mock failure".to_string(),
            });
        }

        Ok(CommandOutput {
            exit_code: Some(0),
            stdout: self
                .stdout
                .lock()
                .get(&spec.program)
                .cloned()
                .unwrap_or_default(),
            stderr: String::new(),
        })
    }
}
