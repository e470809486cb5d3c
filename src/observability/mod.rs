//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!
//! stdout is reserved for the protocol with the client under test:
//!     credential document, ready line, diagnostics, farewell
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing, request ID as a field
//! - Log level from config, overridable through RUST_LOG

pub mod logging;

pub use logging::init_logging;
