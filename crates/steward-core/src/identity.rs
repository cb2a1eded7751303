use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

static GLOBAL: OnceLock<ProcessContext> = OnceLock::new();

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Unable to create several service instances in one process (attempt {attempt}, only one is allowed)"
)]
pub struct DuplicateInstance {
    pub attempt: usize,
}

/// Owns the creation counter that limits a process to a single service.
///
/// Every process has one shared context available through
/// [`ProcessContext::global`]. Tests and embedders that need isolation can
/// create their own with [`ProcessContext::new`].
#[derive(Debug, Default)]
pub struct ProcessContext {
    created: AtomicUsize,
}

impl ProcessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static ProcessContext {
        GLOBAL.get_or_init(ProcessContext::new)
    }

    /// Counts a construction attempt. Failed attempts are counted too, so
    /// once a second attempt has been made every later one fails as well.
    pub fn register(&self) -> Result<ServiceIdentity, DuplicateInstance> {
        let attempt = self.created.fetch_add(1, Ordering::AcqRel) + 1;
        if attempt > 1 {
            return Err(DuplicateInstance { attempt });
        }
        Ok(ServiceIdentity { _private: () })
    }

    pub fn attempts(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }
}

/// Proof that the owning service is the only one created in its context.
/// Deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct ServiceIdentity {
    _private: (),
}

#[cfg(test)]
#[path = "./identity_test.rs"]
mod identity_test;
