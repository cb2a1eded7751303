use steward_core::{EventReporter, Severity};
use tracing::{error, info, warn};

/// Forwards service events to `tracing` under the `steward::event` target.
/// Pair it with a subscriber that writes to the system log (journald,
/// event log) to make the events operator-visible.
#[derive(Clone, Debug)]
pub struct TracingEventReporter {
    source: String,
}

impl TracingEventReporter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl EventReporter for TracingEventReporter {
    fn report(&self, severity: Severity, message: &[u8]) {
        let message = String::from_utf8_lossy(message);
        let source = self.source.as_str();
        match severity {
            Severity::Info => info!(target: "steward::event", source, "{message}"),
            Severity::Warning => warn!(target: "steward::event", source, "{message}"),
            Severity::Error => error!(target: "steward::event", source, "{message}"),
        }
    }
}
