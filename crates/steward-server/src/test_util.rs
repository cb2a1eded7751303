//! Fake facility for exercising a lifecycle without an OS service manager.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use steward_core::{
    ControlAction, ControlFacilityBridge, EventReporter, PauseResumeCapability, Severity,
};
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedTimeout {
    pub action: ControlAction,
    pub timeout: Duration,
    pub at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub action: ControlAction,
    pub at: Instant,
}

/// Records everything a lifecycle tells its facility and its event log.
#[derive(Default)]
pub struct RecordingBridge {
    arguments: Vec<String>,
    armed: Mutex<Vec<ArmedTimeout>>,
    completions: Mutex<Vec<CompletionReport>>,
    events: Mutex<Vec<(Severity, String)>>,
    capability: OnceLock<Arc<PauseResumeCapability>>,
    completed: Notify,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arguments<I, A>(arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn armed(&self) -> Vec<ArmedTimeout> {
        lock(&self.armed).clone()
    }

    pub fn last_armed(&self, action: ControlAction) -> Option<ArmedTimeout> {
        lock(&self.armed)
            .iter()
            .rev()
            .find(|a| a.action == action)
            .cloned()
    }

    pub fn completions(&self) -> Vec<CompletionReport> {
        lock(&self.completions).clone()
    }

    pub fn completion_count(&self, action: ControlAction) -> usize {
        lock(&self.completions)
            .iter()
            .filter(|c| c.action == action)
            .count()
    }

    pub fn events(&self) -> Vec<(Severity, String)> {
        lock(&self.events).clone()
    }

    /// The capability the lifecycle attached, as the facility would read it.
    pub fn accepts_pause_resume(&self) -> Option<bool> {
        self.capability.get().map(|c| c.get())
    }

    /// Waits until `action` has been reported complete at least `count` times.
    pub async fn wait_for_completions(&self, action: ControlAction, count: usize) {
        loop {
            let completed = self.completed.notified();
            if self.completion_count(action) >= count {
                return;
            }
            completed.await;
        }
    }
}

impl ControlFacilityBridge for RecordingBridge {
    fn startup_arguments(&self) -> Vec<String> {
        self.arguments.clone()
    }

    fn arm_timeout(&self, action: ControlAction, timeout: Duration) {
        lock(&self.armed).push(ArmedTimeout {
            action,
            timeout,
            at: Instant::now(),
        });
    }

    fn report_completion(&self, action: ControlAction) {
        lock(&self.completions).push(CompletionReport {
            action,
            at: Instant::now(),
        });
        self.completed.notify_waiters();
    }

    fn attach(&self, capability: Arc<PauseResumeCapability>) {
        self.capability.set(capability).ok();
    }
}

impl EventReporter for RecordingBridge {
    fn report(&self, severity: Severity, message: &[u8]) {
        lock(&self.events).push((severity, String::from_utf8_lossy(message).into_owned()));
    }
}
