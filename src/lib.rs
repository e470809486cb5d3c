//! Self-terminating TLS test server for image fetch authentication.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──TLS──▶ net (self-signed) ──▶ http::server ──▶ http::router
//!                                                            │
//!                           ┌────────────────────────────────┼──────────────┐
//!                           ▼                                ▼              ▼
//!                    auth::validator                 artifact builder   lifecycle
//!                  (none/basic/oauth)               (compile+package)   channels
//!                                                                          │
//!                                               diagnostics + shutdown ────┘
//!                                                          │
//!                                                          ▼
//!                                             lifecycle::ControlLoop ─▶ stdout
//! ```

pub mod artifact;
pub mod auth;
pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use artifact::{ArtifactBuilder, BuildError, ToolchainBuilder};
pub use auth::AuthMode;
pub use config::FixtureConfig;
pub use lifecycle::{start, ControlLoop, ServerHandle};
