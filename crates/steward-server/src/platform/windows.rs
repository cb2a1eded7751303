use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use steward_core::{ControlAction, ControlFacilityBridge, PauseResumeCapability};
use tap::TapFallible;
use tracing::{error, info};
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
    ServiceType,
};
use windows_service::service_control_handler::{
    self, ServiceControlHandlerResult, ServiceStatusHandle,
};

use crate::{ControlClient, Service, ServiceError, ServiceHost, ServiceLifecycle};

/// Reports lifecycle progress to the service control manager.
pub struct ScmBridge<B> {
    inner: B,
    status_handle: Mutex<ServiceStatusHandle>,
    checkpoint: AtomicU32,
    armed: Mutex<HashMap<ControlAction, Duration>>,
    capability: OnceLock<Arc<PauseResumeCapability>>,
}

impl<B: ControlFacilityBridge> ScmBridge<B> {
    /// Registers the control handler for `service_name`, forwarding SCM
    /// controls to `client`.
    pub fn register(
        service_name: &str,
        client: ControlClient,
        inner: B,
    ) -> Result<Self, ServiceError> {
        let status_handle = service_control_handler::register(service_name, control_handler(client))
            .map_err(|e| {
                ServiceError::InitializationFailure(
                    "Error registering control handler".to_owned(),
                    Box::new(e),
                )
            })?;
        Ok(Self {
            inner,
            status_handle: Mutex::new(status_handle),
            checkpoint: AtomicU32::new(0),
            armed: Default::default(),
            capability: OnceLock::new(),
        })
    }

    fn status_handle(&self) -> ServiceStatusHandle {
        *self.status_handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, state: ServiceState, wait_hint: Duration) {
        let controls_accepted = match state {
            ServiceState::StartPending | ServiceState::StopPending | ServiceState::Stopped => {
                ServiceControlAccept::empty()
            }
            _ => self.accepted_controls(),
        };
        let checkpoint = match state {
            ServiceState::StartPending | ServiceState::StopPending => {
                self.checkpoint.fetch_add(1, Ordering::AcqRel) + 1
            }
            _ => 0,
        };
        self.status_handle()
            .set_service_status(ServiceStatus {
                service_type: ServiceType::OWN_PROCESS,
                current_state: state,
                controls_accepted,
                exit_code: ServiceExitCode::Win32(0),
                checkpoint,
                wait_hint,
                process_id: None,
            })
            .tap_err(|e| error!("Error setting status to {state:?}: {e:?}"))
            .ok();
    }

    fn accepted_controls(&self) -> ServiceControlAccept {
        let mut accepted = ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN;
        if self.capability.get().is_some_and(|c| c.get()) {
            accepted |= ServiceControlAccept::PAUSE_CONTINUE;
        }
        accepted
    }

    fn armed_timeout(&self, action: ControlAction) -> Duration {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&action)
            .copied()
            .unwrap_or_default()
    }

    /// Final status, once the run hook returned.
    pub fn report_stopped(&self, exit_code: u32) {
        self.status_handle()
            .set_service_status(ServiceStatus {
                service_type: ServiceType::OWN_PROCESS,
                current_state: ServiceState::Stopped,
                controls_accepted: ServiceControlAccept::empty(),
                exit_code: ServiceExitCode::Win32(exit_code),
                checkpoint: 0,
                wait_hint: Duration::default(),
                process_id: None,
            })
            .tap_err(|e| error!("Error setting status to stopped: {e:?}"))
            .ok();
    }
}

impl<B: ControlFacilityBridge> ControlFacilityBridge for ScmBridge<B> {
    fn startup_arguments(&self) -> Vec<String> {
        self.inner.startup_arguments()
    }

    fn arm_timeout(&self, action: ControlAction, timeout: Duration) {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action, timeout);
        if action == ControlAction::Initialize {
            self.set_status(ServiceState::StartPending, timeout);
        }
        self.inner.arm_timeout(action, timeout);
    }

    fn report_completion(&self, action: ControlAction) {
        match action {
            ControlAction::Initialize | ControlAction::Resume => {
                self.set_status(ServiceState::Running, Duration::default())
            }
            ControlAction::Pause => self.set_status(ServiceState::Paused, Duration::default()),
            ControlAction::Stop => {
                self.set_status(ServiceState::StopPending, self.armed_timeout(action))
            }
            ControlAction::Shutdown => {
                self.set_status(ServiceState::StopPending, Duration::default())
            }
            ControlAction::Run => {}
        }
        self.inner.report_completion(action);
    }

    fn attach(&self, capability: Arc<PauseResumeCapability>) {
        self.capability.set(capability.clone()).ok();
        self.inner.attach(capability);
    }
}

fn control_handler(
    client: ControlClient,
) -> impl FnMut(ServiceControl) -> ServiceControlHandlerResult + Send + 'static {
    move |control| match control {
        // Always answer status queries, the current status was already reported
        ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
        ServiceControl::Stop => {
            info!("Received stop command from service manager");
            client.stop();
            ServiceControlHandlerResult::NoError
        }
        ServiceControl::Shutdown => {
            info!("Received shutdown command from service manager");
            client.shutdown();
            ServiceControlHandlerResult::NoError
        }
        ServiceControl::Pause => {
            client.pause();
            ServiceControlHandlerResult::NoError
        }
        ServiceControl::Continue => {
            client.resume();
            ServiceControlHandlerResult::NoError
        }
        _ => ServiceControlHandlerResult::NotImplemented,
    }
}

/// Body of the `ServiceMain` callback. Call it from the function declared
/// with `windows_service::define_windows_service!`.
pub fn service_main<S: Service>(service: S, arguments: Vec<OsString>) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Tokio runtime failed to initialize: {e}");
            return;
        }
    };
    if let Err(e) = rt.block_on(run_service_main(service, arguments)) {
        error!("{e}");
    }
}

async fn run_service_main<S: Service>(
    service: S,
    arguments: Vec<OsString>,
) -> Result<(), ServiceError> {
    let host = ServiceHost::new(
        arguments
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    let bridge = Arc::new(ScmBridge::register(
        &S::label().application,
        host.client(),
        host.bridge(),
    )?);
    let lifecycle = ServiceLifecycle::builder(service, bridge.clone()).build()?;
    host.run(lifecycle).await;
    bridge.report_stopped(0);
    Ok(())
}
