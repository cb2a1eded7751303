use std::sync::Arc;
use std::time::Duration;

use sd_notify::NotifyState;
use steward_core::{ControlAction, ControlFacilityBridge, PauseResumeCapability};
use tap::TapFallible;
use tracing::{debug, warn};

/// Mirrors lifecycle progress to systemd through `sd_notify`. Everything is
/// forwarded to the wrapped bridge. Outside of systemd (no `NOTIFY_SOCKET`)
/// the notifications are no-ops.
pub struct NotifyBridge<B> {
    inner: B,
}

impl<B: ControlFacilityBridge> NotifyBridge<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn notify(state: NotifyState<'_>) {
    debug!("Sending {state:?} to the service manager");
    sd_notify::notify(false, &[state])
        .tap_err(|e| warn!("Error sending service manager notification: {e:?}"))
        .ok();
}

impl<B: ControlFacilityBridge> ControlFacilityBridge for NotifyBridge<B> {
    fn startup_arguments(&self) -> Vec<String> {
        self.inner.startup_arguments()
    }

    fn arm_timeout(&self, action: ControlAction, timeout: Duration) {
        // Only startup is bounded by systemd while the lifecycle is being set up
        if action == ControlAction::Initialize {
            notify(NotifyState::ExtendTimeoutUsec(
                timeout.as_micros().try_into().unwrap_or(u32::MAX.into()),
            ));
        }
        self.inner.arm_timeout(action, timeout);
    }

    fn report_completion(&self, action: ControlAction) {
        match action {
            ControlAction::Initialize => notify(NotifyState::Ready),
            ControlAction::Pause => notify(NotifyState::Status("Paused")),
            ControlAction::Resume => notify(NotifyState::Status("Running")),
            ControlAction::Stop | ControlAction::Shutdown => notify(NotifyState::Stopping),
            ControlAction::Run => {}
        }
        self.inner.report_completion(action);
    }

    fn attach(&self, capability: Arc<PauseResumeCapability>) {
        self.inner.attach(capability);
    }
}
