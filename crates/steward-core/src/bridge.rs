use std::sync::Arc;
use std::time::Duration;

use crate::{ControlAction, PauseResumeCapability, Severity};

/// The seam between a service and whatever is controlling it: an OS service
/// manager, an init-system supervisor or an in-process host.
pub trait ControlFacilityBridge: Send + Sync + 'static {
    /// Arguments the facility passed to the service on start.
    fn startup_arguments(&self) -> Vec<String>;

    /// Tells the facility how long it should wait for `action` to complete.
    /// The facility enforces the value itself; it is never a cancellation.
    fn arm_timeout(&self, action: ControlAction, timeout: Duration);

    /// Called exactly once per dispatched action after its hook returned.
    /// May arrive after the facility already timed the action out.
    fn report_completion(&self, action: ControlAction);

    /// Hands the facility the service's pause/resume capability so it can
    /// decide whether to forward pause and resume requests. Called once,
    /// when a lifecycle is built on top of this bridge.
    fn attach(&self, _capability: Arc<PauseResumeCapability>) {}
}

/// Sink for operator-visible, severity-tagged messages.
pub trait EventReporter: Send + Sync + 'static {
    fn report(&self, severity: Severity, message: &[u8]);
}

impl<T: ControlFacilityBridge + ?Sized> ControlFacilityBridge for Arc<T> {
    fn startup_arguments(&self) -> Vec<String> {
        (**self).startup_arguments()
    }

    fn arm_timeout(&self, action: ControlAction, timeout: Duration) {
        (**self).arm_timeout(action, timeout)
    }

    fn report_completion(&self, action: ControlAction) {
        (**self).report_completion(action)
    }

    fn attach(&self, capability: Arc<PauseResumeCapability>) {
        (**self).attach(capability)
    }
}

impl<T: EventReporter + ?Sized> EventReporter for Arc<T> {
    fn report(&self, severity: Severity, message: &[u8]) {
        (**self).report(severity, message)
    }
}
