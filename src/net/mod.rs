//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle::start
//!     → tls.rs (self-signed certificate → rustls config)
//!     → axum-server TLS listener (ephemeral port by default)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - A new certificate per run; nothing is read from or written to disk
//! - Peer verification is the client's problem to switch off

pub mod tls;
