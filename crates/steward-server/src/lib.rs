mod containment;

mod context;
pub use context::*;

mod dispatcher;
pub use dispatcher::*;

mod host;
pub use host::*;

mod lifecycle;
pub use lifecycle::*;

mod reporter;
pub use reporter::*;

mod service;
pub use service::*;

mod service_error;
pub use service_error::*;

pub mod platform;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use async_trait::async_trait;
#[cfg(target_os = "linux")]
pub use sd_notify;
pub use steward_core::{
    BoxedError, ControlAction, ControlFacilityBridge, DuplicateInstance, EventReporter, Label,
    LifecycleState, PauseResumeCapability, ProcessContext, Severity,
};
#[cfg(windows)]
pub use windows_service;
pub use {futures, tokio};
