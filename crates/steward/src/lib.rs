pub mod core {
    pub use steward_core::*;
}
#[cfg(feature = "server")]
pub mod server {
    pub use steward_server::*;
}
#[cfg(feature = "logging")]
pub mod logging {
    pub use steward_logging::*;
}
#[cfg(feature = "config")]
pub mod config {
    pub use steward_config::*;
}
#[cfg(feature = "error-handler")]
pub mod error_handler {
    pub use steward_error_handler::*;
}
#[cfg(feature = "signals")]
pub mod signals {
    pub use steward_signals::*;
}
