//! Process-level control loop.
//!
//! ```text
//!            diagnostic → print
//!              ┌─────┐
//!              ▼     │
//!   start → Running ─┘ ── shutdown → print "Byebye", stop → Stopped
//! ```

use std::io::Write;

use thiserror::Error;

use crate::lifecycle::startup::{ControlEvent, ServerHandle, StopError};

/// Final line written before the server is torn down.
pub const FAREWELL: &str = "Byebye";

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Stop(#[from] StopError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Running,
    Stopped,
}

/// Prints diagnostics until a shutdown request arrives, then stops the server.
pub struct ControlLoop<W> {
    out: W,
    state: ControlState,
}

impl<W: Write> ControlLoop<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: ControlState::Running,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Drive `server` until shutdown. Returns the output sink.
    pub async fn run(mut self, mut server: ServerHandle) -> Result<W, ControlError> {
        while self.state == ControlState::Running {
            match server.next_event().await {
                ControlEvent::Diagnostic(line) => self.print(&line)?,
                ControlEvent::Shutdown => {
                    tracing::debug!("Shutdown signal received");
                    self.state = ControlState::Stopped;
                }
            }
        }

        for line in server.pending_diagnostics() {
            self.print(&line)?;
        }
        self.print(FAREWELL)?;

        server.stop().await?;
        Ok(self.out)
    }

    fn print(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}
