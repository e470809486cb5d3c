//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → request.rs (request ID lookup)
//!     → router.rs (method → auth → path → image build)
//!     → Send to client, diagnostics to the control loop
//! ```

pub mod request;
pub mod router;
pub mod server;

pub use request::{request_id, MakeShortRequestId, X_REQUEST_ID};
pub use router::{RequestRouter, ARTIFACT_NAME};
pub use server::build_app;
