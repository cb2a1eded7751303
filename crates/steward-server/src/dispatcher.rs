use std::sync::Arc;

use steward_core::ControlAction;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::containment::contain;
use crate::{LifecycleContext, Service};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0} is not dispatched as a control request")]
    NotDispatchable(ControlAction),
}

/// Starts one independent task per control request.
///
/// Dispatching never waits on the hook, so a facility can arm its timeout
/// right after dispatching. Requests are neither deduplicated nor
/// serialized; overlapping requests run fully in parallel.
pub struct ControlRequestDispatcher<S: Service> {
    service: Arc<S>,
    context: LifecycleContext,
}

impl<S: Service> ControlRequestDispatcher<S> {
    pub(crate) fn new(service: Arc<S>, context: LifecycleContext) -> Self {
        Self { service, context }
    }

    /// Must be called from within a Tokio runtime. The returned handle
    /// resolves after the completion was reported; dropping it doesn't
    /// affect the execution.
    pub fn dispatch(&self, action: ControlAction) -> Result<JoinHandle<()>, DispatchError> {
        if !action.is_dispatchable() {
            return Err(DispatchError::NotDispatchable(action));
        }
        debug!(%action, "Dispatching control request");
        let service = self.service.clone();
        let context = self.context.clone();
        Ok(tokio::spawn(execute(service, context, action)))
    }
}

async fn execute<S: Service>(service: Arc<S>, context: LifecycleContext, action: ControlAction) {
    let hook_context = context.clone();
    let hook = async move {
        match action {
            ControlAction::Initialize => service.initialize(hook_context).await.map(Some),
            ControlAction::Pause => service.pause(hook_context).await.map(|_| None),
            ControlAction::Resume => service.resume(hook_context).await.map(|_| None),
            ControlAction::Stop => service.stop(hook_context).await.map(|_| None),
            ControlAction::Shutdown => service.shutdown(hook_context).await.map(|_| None),
            // Rejected by dispatch
            ControlAction::Run => Ok(None),
        }
    };

    if let Some(Some(accepts_pause_resume)) = contain(action, hook).await {
        if context.capability().latch(accepts_pause_resume) {
            debug!(accepts_pause_resume, "Pause/resume capability latched");
        } else {
            warn!("Initialize completed again, keeping the first pause/resume capability");
        }
    }

    debug!(%action, "Reporting completion");
    context.bridge().report_completion(action);
}

#[cfg(test)]
#[path = "./dispatcher_test.rs"]
mod dispatcher_test;
