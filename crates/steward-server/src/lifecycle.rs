use std::sync::Arc;
use std::time::Duration;

use steward_core::{
    ControlAction, ControlFacilityBridge, DuplicateInstance, EventReporter, ProcessContext,
    ServiceIdentity, TimeoutTable,
};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::containment::contain;
use crate::{
    ControlRequestDispatcher, DispatchError, LifecycleContext, Service, TracingEventReporter,
};

/// Composition root tying a [`Service`] to the facility controlling it.
///
/// Only one lifecycle can be built per [`ProcessContext`], which for
/// [`ServiceLifecycleBuilder::build`] is the process-wide context.
pub struct ServiceLifecycle<S: Service> {
    service: Arc<S>,
    context: LifecycleContext,
    dispatcher: ControlRequestDispatcher<S>,
    _identity: ServiceIdentity,
}

impl<S: Service> ServiceLifecycle<S> {
    pub fn builder<B>(service: S, bridge: B) -> ServiceLifecycleBuilder<S>
    where
        B: ControlFacilityBridge,
    {
        ServiceLifecycleBuilder::new(service, bridge)
    }

    pub fn context(&self) -> &LifecycleContext {
        &self.context
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// See [`ControlRequestDispatcher::dispatch`].
    pub fn dispatch(&self, action: ControlAction) -> Result<JoinHandle<()>, DispatchError> {
        self.dispatcher.dispatch(action)
    }

    /// Starts the run hook on its own task. Failures are contained the same
    /// way as for dispatched requests, but no completion is reported: the
    /// service is simply finished once the task ends.
    pub fn start_run(&self) -> JoinHandle<()> {
        let service = self.service.clone();
        let context = self.context.clone();
        tokio::spawn(async move {
            contain(ControlAction::Run, async move { service.run(context).await }).await;
            debug!("Run hook returned");
        })
    }

    pub fn accepts_pause_resume(&self) -> bool {
        self.context.accepts_pause_resume()
    }

    pub fn timeout(&self, action: ControlAction) -> Option<Duration> {
        self.context.timeout(action)
    }
}

pub struct ServiceLifecycleBuilder<S: Service> {
    service: S,
    bridge: Arc<dyn ControlFacilityBridge>,
    reporter: Option<Arc<dyn EventReporter>>,
    timeouts: TimeoutTable,
}

impl<S: Service> ServiceLifecycleBuilder<S> {
    pub fn new<B>(service: S, bridge: B) -> Self
    where
        B: ControlFacilityBridge,
    {
        Self {
            service,
            bridge: Arc::new(bridge),
            reporter: None,
            timeouts: TimeoutTable::new(),
        }
    }

    /// Defaults to a [`TracingEventReporter`] named after the service label.
    pub fn with_event_reporter<R>(mut self, reporter: R) -> Self
    where
        R: EventReporter,
    {
        self.reporter = Some(Arc::new(reporter) as Arc<dyn EventReporter>);
        self
    }

    pub fn with_initialize_timeout(self, timeout: Duration) -> Self {
        self.with_timeout(ControlAction::Initialize, timeout)
    }

    pub fn with_pause_timeout(self, timeout: Duration) -> Self {
        self.with_timeout(ControlAction::Pause, timeout)
    }

    pub fn with_resume_timeout(self, timeout: Duration) -> Self {
        self.with_timeout(ControlAction::Resume, timeout)
    }

    pub fn with_stop_timeout(self, timeout: Duration) -> Self {
        self.with_timeout(ControlAction::Stop, timeout)
    }

    #[cfg(feature = "config")]
    pub fn with_timeout_config(self, config: &steward_config::TimeoutConfig) -> Self {
        self.with_initialize_timeout(config.initialize())
            .with_pause_timeout(config.pause())
            .with_resume_timeout(config.resume())
            .with_stop_timeout(config.stop())
    }

    fn with_timeout(self, action: ControlAction, timeout: Duration) -> Self {
        self.timeouts.set(action, timeout);
        self
    }

    /// Builds the lifecycle in the process-wide context.
    pub fn build(self) -> Result<ServiceLifecycle<S>, DuplicateInstance> {
        self.build_in(ProcessContext::global())
    }

    /// For entry points that must not continue when a second service is
    /// created: logs the condition and aborts the process.
    pub fn build_or_abort(self) -> ServiceLifecycle<S> {
        match self.build() {
            Ok(lifecycle) => lifecycle,
            Err(e) => {
                error!("{e}");
                std::process::abort();
            }
        }
    }

    pub fn build_in(
        self,
        process: &ProcessContext,
    ) -> Result<ServiceLifecycle<S>, DuplicateInstance> {
        let identity = process.register()?;
        let label = S::label();
        let reporter = match self.reporter {
            Some(reporter) => reporter,
            None => Arc::new(TracingEventReporter::new(label.application.clone())),
        };
        let context = LifecycleContext::new(label, self.bridge, reporter, self.timeouts);
        context.bridge().attach(context.capability().clone());
        context.arm_all();

        let service = Arc::new(self.service);
        Ok(ServiceLifecycle {
            dispatcher: ControlRequestDispatcher::new(service.clone(), context.clone()),
            service,
            context,
            _identity: identity,
        })
    }
}

#[cfg(test)]
#[path = "./lifecycle_test.rs"]
mod lifecycle_test;
