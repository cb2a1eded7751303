use std::future::Future;

use steward_core::{BoxedError, ControlAction};
use tracing::debug;

/// Runs a hook on its own task and absorbs anything that goes wrong inside
/// it. Returns `None` if the hook returned an error, panicked or was
/// cancelled.
///
/// This is the fault boundary between user code and the control channel:
/// no failure of a hook may keep its completion from being reported.
pub(crate) async fn contain<F, T>(action: ControlAction, hook: F) -> Option<T>
where
    F: Future<Output = Result<T, BoxedError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(hook).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            debug!(%action, "Hook returned an error: {e:?}");
            None
        }
        Err(e) if e.is_panic() => {
            debug!(%action, "Hook panicked");
            None
        }
        Err(e) => {
            debug!(%action, "Hook was cancelled: {e}");
            None
        }
    }
}

#[cfg(test)]
#[path = "./containment_test.rs"]
mod containment_test;
