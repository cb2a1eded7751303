use std::sync::atomic::{AtomicU8, Ordering};

const UNSET: u8 = 0;
const REJECTED: u8 = 1;
const ACCEPTED: u8 = 2;

/// Whether the service accepts pause and resume requests.
///
/// Starts out `false` and is latched once, by the completion of the
/// initialize hook. The write is published with release ordering so a
/// facility reading from another thread sees it as soon as it lands.
/// A late write after an initialize timeout is still the first write and
/// therefore still wins.
#[derive(Debug, Default)]
pub struct PauseResumeCapability {
    state: AtomicU8,
}

impl PauseResumeCapability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.state.load(Ordering::Acquire) == ACCEPTED
    }

    pub fn is_latched(&self) -> bool {
        self.state.load(Ordering::Acquire) != UNSET
    }

    /// Stores `accepts` if nothing was stored yet. Returns `false` when the
    /// capability had already been latched, in which case the value is kept.
    pub fn latch(&self, accepts: bool) -> bool {
        let value = if accepts { ACCEPTED } else { REJECTED };
        self.state
            .compare_exchange(UNSET, value, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
#[path = "./capability_test.rs"]
mod capability_test;
