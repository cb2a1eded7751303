use async_trait::async_trait;
use steward_core::{BoxedError, Label};

use crate::LifecycleContext;

/// The hooks a service implements. Every hook has a no-op default, so a
/// service only overrides what it needs; most will at least implement
/// [`Service::run`].
///
/// Each hook runs on its own task and may run concurrently with any other
/// hook. Coordinating between them (e.g. making `run` return once `stop`
/// was called) is up to the implementation.
///
/// Errors and panics coming out of a hook never reach the controlling
/// facility. They are contained at the task boundary and the completion is
/// reported anyway, so log anything worth keeping through the context
/// before returning.
///
/// Hooks are polled on the async runtime. Blocking work belongs in
/// [`tokio::task::spawn_blocking`].
#[async_trait]
pub trait Service: Send + Sync + 'static {
    fn label() -> Label
    where
        Self: Sized;

    /// Returns whether the service accepts pause and resume requests.
    async fn initialize(&self, _context: LifecycleContext) -> Result<bool, BoxedError> {
        Ok(false)
    }

    /// Main routine. Called once, after initialization completed or timed
    /// out. The service is finished as soon as this returns.
    async fn run(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        Ok(())
    }

    async fn pause(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        Ok(())
    }

    async fn resume(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        Ok(())
    }

    async fn stop(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        Ok(())
    }

    /// Called when the OS is shutting down. The time available is bounded
    /// by the OS and can't be configured.
    async fn shutdown(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        Ok(())
    }
}
