use steward_core::{BoxedError, DuplicateInstance};

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DuplicateInstance(#[from] DuplicateInstance),
    #[error("Service manager failed during initialization: {0}: {1:?}")]
    InitializationFailure(String, #[source] BoxedError),
}
