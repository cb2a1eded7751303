use strum::Display;

/// Where a service is in its lifecycle, as tracked by the controlling facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LifecycleState {
    NotStarted,
    Initializing,
    InitCompleted,
    InitTimedOut,
    Running,
    Paused,
    Stopping,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LifecycleEvent {
    Start,
    InitCompleted,
    InitTimedOut,
    RunStarted,
    Paused,
    Resumed,
    StopRequested,
    ShutdownRequested,
    RunReturned,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid lifecycle transition: {event} is not allowed while {state}")]
pub struct TransitionError {
    pub state: LifecycleState,
    pub event: LifecycleEvent,
}

impl LifecycleState {
    pub fn transition(self, event: LifecycleEvent) -> Result<LifecycleState, TransitionError> {
        use LifecycleEvent as E;
        use LifecycleState as S;

        let next = match (self, event) {
            (S::NotStarted, E::Start) => S::Initializing,
            (S::Initializing, E::InitCompleted) => S::InitCompleted,
            (S::Initializing, E::InitTimedOut) => S::InitTimedOut,
            (S::InitCompleted | S::InitTimedOut, E::RunStarted) => S::Running,
            (S::Running, E::Paused) => S::Paused,
            (S::Paused, E::Resumed) => S::Running,
            (S::Running | S::Paused, E::StopRequested) => S::Stopping,
            // Shutdown can interrupt anything once the service was started.
            (S::NotStarted | S::Terminated, E::ShutdownRequested) => {
                return Err(TransitionError { state: self, event });
            }
            (_, E::ShutdownRequested) => S::Stopping,
            // An early shutdown doesn't stop initialize from resolving or run from being called.
            (S::Stopping, E::InitCompleted | E::InitTimedOut | E::RunStarted) => S::Stopping,
            (S::Running | S::Paused | S::Stopping, E::RunReturned) => S::Terminated,
            _ => return Err(TransitionError { state: self, event }),
        };
        Ok(next)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, LifecycleState::Terminated)
    }

    /// Whether initialize has resolved, by completion or by timeout.
    pub fn is_initialized(&self) -> bool {
        !matches!(
            self,
            LifecycleState::NotStarted | LifecycleState::Initializing
        )
    }
}

#[cfg(test)]
#[path = "./state_test.rs"]
mod state_test;
