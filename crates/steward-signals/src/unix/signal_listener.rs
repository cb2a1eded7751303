use std::ffi::c_int;
use std::io;

use futures::stream::StreamExt;
use signal_hook::consts::signal::{SIGCONT, SIGINT, SIGQUIT, SIGTERM, SIGTSTP};
use signal_hook_tokio::{Handle, Signals};
use steward_server::{ControlClient, ControlRequest};
use tap::TapFallible;
use tracing::{debug, info};

const HANDLED: [c_int; 5] = [SIGTERM, SIGINT, SIGQUIT, SIGTSTP, SIGCONT];

/// Forwards `SIGTERM`/`SIGINT` as stop, `SIGQUIT` as shutdown, `SIGTSTP`
/// as pause and `SIGCONT` as resume.
pub struct SignalListener {
    signals: Signals,
    client: ControlClient,
}

impl SignalListener {
    pub fn all(client: ControlClient) -> io::Result<Self> {
        let signals = Signals::new(HANDLED)
            .tap_err(|e| debug!("Error registering signal handlers: {e:?}"))?;
        Ok(Self { signals, client })
    }

    /// Closing the handle makes [`run`](Self::run) return.
    pub fn handle(&self) -> Handle {
        self.signals.handle()
    }

    pub fn request_for(signal: c_int) -> Option<ControlRequest> {
        match signal {
            SIGTERM | SIGINT => Some(ControlRequest::Stop),
            SIGQUIT => Some(ControlRequest::Shutdown),
            SIGTSTP => Some(ControlRequest::Pause),
            SIGCONT => Some(ControlRequest::Resume),
            _ => None,
        }
    }

    /// Runs until a stop or shutdown was forwarded, the host went away or
    /// the handle was closed.
    pub async fn run(self) {
        let handle = self.signals.handle();
        let mut signals = self.signals.fuse();
        while let Some(signal) = signals.next().await {
            let signal_name = signal_hook::low_level::signal_name(signal).unwrap_or("unknown");
            let Some(request) = Self::request_for(signal) else {
                continue;
            };
            info!("Received {signal_name}, requesting {request:?}");
            if !self.client.send(request)
                || matches!(request, ControlRequest::Stop | ControlRequest::Shutdown)
            {
                break;
            }
        }
        handle.close();
    }
}

#[cfg(test)]
#[path = "./signal_listener_test.rs"]
mod signal_listener_test;
