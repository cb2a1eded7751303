use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::ControlAction;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Upper bound the OS puts on shutdown handling. Documented as "less than
/// 20 seconds" and not settable by the service.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Per-action timeouts for the configurable actions.
///
/// Values are meant to be set before the matching action is first
/// dispatched. Storage is atomic so a hook may still adjust another
/// action's timeout while running without any locking.
#[derive(Debug)]
pub struct TimeoutTable {
    initialize: AtomicU64,
    pause: AtomicU64,
    resume: AtomicU64,
    stop: AtomicU64,
}

impl Default for TimeoutTable {
    fn default() -> Self {
        let default = DEFAULT_TIMEOUT.as_millis() as u64;
        Self {
            initialize: AtomicU64::new(default),
            pause: AtomicU64::new(default),
            resume: AtomicU64::new(default),
            stop: AtomicU64::new(default),
        }
    }
}

impl TimeoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, action: ControlAction) -> Option<&AtomicU64> {
        match action {
            ControlAction::Initialize => Some(&self.initialize),
            ControlAction::Pause => Some(&self.pause),
            ControlAction::Resume => Some(&self.resume),
            ControlAction::Stop => Some(&self.stop),
            ControlAction::Run | ControlAction::Shutdown => None,
        }
    }

    /// Stores a new timeout. Returns `false` without storing anything for
    /// `Run` and `Shutdown`.
    pub fn set(&self, action: ControlAction, timeout: Duration) -> bool {
        match self.slot(action) {
            Some(slot) => {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                slot.store(millis, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// The configured timeout. `Shutdown` always reports the fixed OS bound;
    /// `Run` is never timed.
    pub fn get(&self, action: ControlAction) -> Option<Duration> {
        match action {
            ControlAction::Shutdown => Some(SHUTDOWN_TIMEOUT),
            ControlAction::Run => None,
            _ => self
                .slot(action)
                .map(|slot| Duration::from_millis(slot.load(Ordering::Acquire))),
        }
    }
}

#[cfg(test)]
#[path = "./timeout_test.rs"]
mod timeout_test;
