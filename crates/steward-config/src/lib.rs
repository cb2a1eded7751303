mod app_config;
mod app_config_builder;
mod error;
mod service_config;

pub use app_config::*;
pub use app_config_builder::*;
pub use error::*;
pub use service_config::*;
pub use {arc_swap, confique};
