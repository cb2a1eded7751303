use std::sync::Arc;
use std::time::Duration;

use steward_core::{
    ControlAction, ControlFacilityBridge, EventReporter, Label, PauseResumeCapability, Severity,
    TimeoutTable,
};
use tracing::debug;

struct Shared {
    label: Label,
    bridge: Arc<dyn ControlFacilityBridge>,
    reporter: Arc<dyn EventReporter>,
    timeouts: TimeoutTable,
    capability: Arc<PauseResumeCapability>,
}

/// Handle given to every hook: event logging, timeout configuration and
/// the arguments the service was started with.
#[derive(Clone)]
pub struct LifecycleContext {
    shared: Arc<Shared>,
}

impl LifecycleContext {
    pub(crate) fn new(
        label: Label,
        bridge: Arc<dyn ControlFacilityBridge>,
        reporter: Arc<dyn EventReporter>,
        timeouts: TimeoutTable,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                label,
                bridge,
                reporter,
                timeouts,
                capability: Arc::new(PauseResumeCapability::new()),
            }),
        }
    }

    pub fn label(&self) -> &Label {
        &self.shared.label
    }

    pub fn startup_arguments(&self) -> Vec<String> {
        self.shared.bridge.startup_arguments()
    }

    pub fn log_info(&self, message: impl AsRef<str>) {
        self.report(Severity::Info, message);
    }

    pub fn log_warning(&self, message: impl AsRef<str>) {
        self.report(Severity::Warning, message);
    }

    pub fn log_error(&self, message: impl AsRef<str>) {
        self.report(Severity::Error, message);
    }

    pub fn report(&self, severity: Severity, message: impl AsRef<str>) {
        self.shared
            .reporter
            .report(severity, message.as_ref().as_bytes());
    }

    pub fn set_initialize_timeout(&self, timeout: Duration) {
        self.set_timeout(ControlAction::Initialize, timeout);
    }

    pub fn set_pause_timeout(&self, timeout: Duration) {
        self.set_timeout(ControlAction::Pause, timeout);
    }

    pub fn set_resume_timeout(&self, timeout: Duration) {
        self.set_timeout(ControlAction::Resume, timeout);
    }

    pub fn set_stop_timeout(&self, timeout: Duration) {
        self.set_timeout(ControlAction::Stop, timeout);
    }

    pub fn timeout(&self, action: ControlAction) -> Option<Duration> {
        self.shared.timeouts.get(action)
    }

    pub fn accepts_pause_resume(&self) -> bool {
        self.shared.capability.get()
    }

    pub(crate) fn set_timeout(&self, action: ControlAction, timeout: Duration) {
        if self.shared.timeouts.set(action, timeout) {
            debug!(%action, ?timeout, "Arming timeout");
            self.shared.bridge.arm_timeout(action, timeout);
        }
    }

    pub(crate) fn arm_all(&self) {
        for action in ControlAction::CONFIGURABLE {
            if let Some(timeout) = self.shared.timeouts.get(action) {
                self.shared.bridge.arm_timeout(action, timeout);
            }
        }
    }

    pub(crate) fn capability(&self) -> &Arc<PauseResumeCapability> {
        &self.shared.capability
    }

    pub(crate) fn bridge(&self) -> &Arc<dyn ControlFacilityBridge> {
        &self.shared.bridge
    }
}
