mod signal_listener;
pub use signal_listener::*;
