use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use steward_core::{
    ControlAction, ControlFacilityBridge, DEFAULT_TIMEOUT, LifecycleEvent, LifecycleState,
    PauseResumeCapability,
};
use tap::TapFallible;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{Service, ServiceLifecycle, ServiceLifecycleBuilder, platform};

/// Requests a facility may send to a running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRequest {
    Pause,
    Resume,
    Stop,
    Shutdown,
}

impl From<ControlRequest> for ControlAction {
    fn from(request: ControlRequest) -> Self {
        match request {
            ControlRequest::Pause => ControlAction::Pause,
            ControlRequest::Resume => ControlAction::Resume,
            ControlRequest::Stop => ControlAction::Stop,
            ControlRequest::Shutdown => ControlAction::Shutdown,
        }
    }
}

/// Sends control requests to a [`ServiceHost`]. Safe to use from any
/// thread, including OS callbacks outside the async runtime.
#[derive(Clone, Debug)]
pub struct ControlClient {
    tx: mpsc::UnboundedSender<ControlRequest>,
}

impl ControlClient {
    /// A client along with the receiving end, for facilities that drive a
    /// lifecycle themselves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ControlRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `false` if the host is no longer running.
    pub fn send(&self, request: ControlRequest) -> bool {
        self.tx
            .send(request)
            .tap_err(|e| debug!("Host is gone, dropping {:?}", e.0))
            .is_ok()
    }

    pub fn pause(&self) -> bool {
        self.send(ControlRequest::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(ControlRequest::Resume)
    }

    pub fn stop(&self) -> bool {
        self.send(ControlRequest::Stop)
    }

    pub fn shutdown(&self) -> bool {
        self.send(ControlRequest::Shutdown)
    }
}

/// The bridge a [`ServiceHost`] hands to its service.
pub struct HostBridge {
    arguments: Vec<String>,
    armed: Mutex<HashMap<ControlAction, Duration>>,
    capability: OnceLock<Arc<PauseResumeCapability>>,
    completion_tx: broadcast::Sender<ControlAction>,
}

impl HostBridge {
    fn new(arguments: Vec<String>) -> Self {
        let (completion_tx, _) = broadcast::channel(64);
        Self {
            arguments,
            armed: Default::default(),
            capability: OnceLock::new(),
            completion_tx,
        }
    }

    pub fn armed_timeout(&self, action: ControlAction) -> Option<Duration> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&action)
            .copied()
    }

    pub fn accepts_pause_resume(&self) -> bool {
        self.capability.get().is_some_and(|c| c.get())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControlAction> {
        self.completion_tx.subscribe()
    }
}

impl ControlFacilityBridge for HostBridge {
    fn startup_arguments(&self) -> Vec<String> {
        self.arguments.clone()
    }

    fn arm_timeout(&self, action: ControlAction, timeout: Duration) {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action, timeout);
    }

    fn report_completion(&self, action: ControlAction) {
        self.completion_tx.send(action).ok();
    }

    fn attach(&self, capability: Arc<PauseResumeCapability>) {
        self.capability
            .set(capability)
            .tap_err(|_| warn!("A lifecycle was already attached to this host"))
            .ok();
    }
}

/// In-process control facility.
///
/// Plays the role an OS service manager would: starts initialize and waits
/// for it up to its timeout, calls run exactly once either way, and
/// forwards control requests while run is executing. Timeouts are only
/// reported, never enforced on the hook.
pub struct ServiceHost {
    bridge: Arc<HostBridge>,
    client: ControlClient,
    control_rx: mpsc::UnboundedReceiver<ControlRequest>,
    state_tx: watch::Sender<LifecycleState>,
}

impl ServiceHost {
    pub fn new<I, A>(arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let (client, control_rx) = ControlClient::channel();
        let (state_tx, _) = watch::channel(LifecycleState::NotStarted);
        Self {
            bridge: Arc::new(HostBridge::new(
                arguments.into_iter().map(Into::into).collect(),
            )),
            client,
            control_rx,
            state_tx,
        }
    }

    pub fn bridge(&self) -> Arc<HostBridge> {
        self.bridge.clone()
    }

    pub fn client(&self) -> ControlClient {
        self.client.clone()
    }

    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Builder wired to this host, with the platform's notification bridge
    /// layered on top when there is one.
    pub fn lifecycle_builder<S: Service>(&self, service: S) -> ServiceLifecycleBuilder<S> {
        ServiceLifecycle::builder(service, platform::notify_bridge(self.bridge()))
    }

    /// Drives the lifecycle until the run hook returns. The lifecycle must
    /// have been built on this host's bridge.
    pub async fn run<S: Service>(mut self, lifecycle: ServiceLifecycle<S>) {
        let mut completions = self.bridge.subscribe();
        let mut watchers = vec![];

        self.transition(LifecycleEvent::Start);
        let init_timeout = self.timeout(&lifecycle, ControlAction::Initialize);
        lifecycle
            .dispatch(ControlAction::Initialize)
            .tap_err(|e| warn!("{e}"))
            .ok();
        let deadline = tokio::time::sleep(init_timeout);
        tokio::pin!(deadline);

        let init_event = loop {
            tokio::select! {
                completion = completions.recv() => match completion {
                    Ok(ControlAction::Initialize) => break LifecycleEvent::InitCompleted,
                    Ok(action) => self.on_completion(action),
                    Err(e) => debug!("Completion stream error: {e}"),
                },
                _ = &mut deadline => {
                    lifecycle.context().log_warning(format!(
                        "Initialization did not complete within {} ms",
                        init_timeout.as_millis()
                    ));
                    break LifecycleEvent::InitTimedOut;
                }
                Some(request) = self.control_rx.recv() => {
                    self.handle_request(&lifecycle, request, &mut watchers);
                }
            }
        };
        self.transition(init_event);

        self.transition(LifecycleEvent::RunStarted);
        let mut run_task = lifecycle.start_run();
        loop {
            tokio::select! {
                _ = &mut run_task => break,
                completion = completions.recv() => match completion {
                    Ok(action) => self.on_completion(action),
                    Err(e) => debug!("Completion stream error: {e}"),
                },
                Some(request) = self.control_rx.recv() => {
                    self.handle_request(&lifecycle, request, &mut watchers);
                }
            }
        }

        // Give in-flight stop and shutdown handlers until their timeout
        join_all(watchers).await;
        self.transition(LifecycleEvent::RunReturned);
        info!("Service terminated");
    }

    fn handle_request<S: Service>(
        &self,
        lifecycle: &ServiceLifecycle<S>,
        request: ControlRequest,
        watchers: &mut Vec<JoinHandle<()>>,
    ) {
        let action = ControlAction::from(request);
        match request {
            ControlRequest::Pause | ControlRequest::Resume
                if !self.bridge.accepts_pause_resume() =>
            {
                info!(%action, "Service doesn't accept pause/resume requests, ignoring");
                return;
            }
            ControlRequest::Stop => self.transition(LifecycleEvent::StopRequested),
            ControlRequest::Shutdown => self.transition(LifecycleEvent::ShutdownRequested),
            ControlRequest::Pause | ControlRequest::Resume => {}
        }

        let watcher = self.dispatch(lifecycle, action);
        if let (Some(watcher), ControlRequest::Stop | ControlRequest::Shutdown) =
            (watcher, request)
        {
            watchers.push(watcher);
        }
    }

    fn dispatch<S: Service>(
        &self,
        lifecycle: &ServiceLifecycle<S>,
        action: ControlAction,
    ) -> Option<JoinHandle<()>> {
        let timeout = self.timeout(lifecycle, action);
        // Subscribe first so a fast hook can't complete unseen
        let mut completions = self.bridge.subscribe();
        lifecycle.dispatch(action).tap_err(|e| warn!("{e}")).ok()?;

        let context = lifecycle.context().clone();
        Some(tokio::spawn(async move {
            if tokio::time::timeout(timeout, wait_for(&mut completions, action))
                .await
                .is_err()
            {
                context.log_warning(format!(
                    "{action} did not complete within {} ms",
                    timeout.as_millis()
                ));
            }
        }))
    }

    fn on_completion(&self, action: ControlAction) {
        match action {
            ControlAction::Pause => self.transition(LifecycleEvent::Paused),
            ControlAction::Resume => self.transition(LifecycleEvent::Resumed),
            ControlAction::Initialize => debug!("Initialize completed after its timeout"),
            _ => debug!(%action, "Control request completed"),
        }
    }

    fn timeout<S: Service>(
        &self,
        lifecycle: &ServiceLifecycle<S>,
        action: ControlAction,
    ) -> Duration {
        self.bridge
            .armed_timeout(action)
            .or_else(|| lifecycle.timeout(action))
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn transition(&self, event: LifecycleEvent) {
        self.state_tx.send_if_modified(|state| match state.transition(event) {
            Ok(next) => {
                debug!(%event, from = %state, to = %next, "Lifecycle transition");
                let changed = *state != next;
                *state = next;
                changed
            }
            Err(e) => {
                debug!("{e}");
                false
            }
        });
    }
}

async fn wait_for(completions: &mut broadcast::Receiver<ControlAction>, action: ControlAction) {
    loop {
        match completions.recv().await {
            Ok(completed) if completed == action => return,
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return,
        }
    }
}

#[cfg(test)]
#[path = "./host_test.rs"]
mod host_test;
