use std::io;

use steward_server::{ControlClient, ControlRequest};
use tokio::signal::windows::{
    CtrlBreak, CtrlC, CtrlClose, CtrlLogoff, CtrlShutdown, ctrl_break, ctrl_c, ctrl_close,
    ctrl_logoff, ctrl_shutdown,
};
use tracing::info;

/// Forwards ctrl-c and ctrl-break as stop, and console close, logoff and
/// system shutdown as shutdown.
pub struct SignalListener {
    client: ControlClient,
    ctrl_c: CtrlC,
    ctrl_break: CtrlBreak,
    ctrl_shutdown: CtrlShutdown,
    ctrl_logoff: CtrlLogoff,
    ctrl_close: CtrlClose,
}

impl SignalListener {
    /// Must be called within a tokio runtime.
    pub fn all(client: ControlClient) -> io::Result<Self> {
        Ok(Self {
            client,
            ctrl_c: ctrl_c()?,
            ctrl_break: ctrl_break()?,
            ctrl_shutdown: ctrl_shutdown()?,
            ctrl_logoff: ctrl_logoff()?,
            ctrl_close: ctrl_close()?,
        })
    }

    /// Runs until a request was forwarded or the host went away.
    pub async fn run(mut self) {
        let (event, request) = tokio::select! {
            _ = self.ctrl_c.recv() => ("ctrl-c", ControlRequest::Stop),
            _ = self.ctrl_break.recv() => ("ctrl-break", ControlRequest::Stop),
            _ = self.ctrl_shutdown.recv() => ("ctrl-shutdown", ControlRequest::Shutdown),
            _ = self.ctrl_logoff.recv() => ("ctrl-logoff", ControlRequest::Shutdown),
            _ = self.ctrl_close.recv() => ("ctrl-close", ControlRequest::Shutdown),
        };
        info!("Received {event}, requesting {request:?}");
        self.client.send(request);
    }
}
