mod action;
pub use action::*;

mod bridge;
pub use bridge::*;

mod capability;
pub use capability::*;

mod identity;
pub use identity::*;

mod label;
pub use label::*;

mod state;
pub use state::*;

mod timeout;
pub use timeout::*;

use std::error::Error;

pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;
