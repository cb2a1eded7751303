//! Turns process signals into control requests, for services run from a
//! terminal or under a supervisor that only speaks signals.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::*;
