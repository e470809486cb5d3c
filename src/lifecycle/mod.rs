//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Certificate → Bind TLS listener → Router bound to auth mode → ServerHandle
//!
//! Running (control.rs):
//!     diagnostics.rs: router ──lines──▶ ControlLoop ─▶ stdout
//!     shutdown.rs:    router ──POST───▶ ControlLoop ─▶ Stopped
//!
//! Shutdown (startup.rs):
//!     Stop accepting → Drain in-flight requests → Close listener
//! ```
//!
//! # Design Decisions
//! - Two typed channels, one consumer multiplexing both
//! - Shutdown is the only transition out of Running
//! - Shutdown drain has a configurable deadline

pub mod control;
pub mod diagnostics;
pub mod shutdown;
pub mod startup;

pub use control::{ControlError, ControlLoop, ControlState, FAREWELL};
pub use diagnostics::{diagnostic_channel, DiagnosticStream, Diagnostics};
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use startup::{start, ControlEvent, ServerHandle, StartupError, StopError};
