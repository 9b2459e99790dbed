//! OS signal handling.
//!
//! SIGINT and SIGTERM both end the process. SIGKILL cannot be observed.
//! Handlers are installed eagerly so a signal that arrives while the gateway
//! is still starting is not lost.

use tokio::signal::unix::{signal, Signal, SignalKind};

/// Installed termination handlers.
pub struct TerminationSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl TerminationSignals {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next termination signal and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}
