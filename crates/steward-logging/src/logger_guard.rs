use std::sync::Arc;

/// Keeps the non-blocking writers alive. Buffered lines are flushed when the
/// last clone is dropped, so hold on to it until the process exits.
#[must_use]
#[derive(Clone, Default)]
pub struct LoggerGuard {
    guards: Vec<Arc<dyn Send + Sync>>,
}

impl LoggerGuard {
    pub(crate) fn add_guard(&mut self, guard: impl Send + Sync + 'static) {
        self.guards.push(Arc::new(guard));
    }
}
