//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! GET request headers
//!     → validator.rs (mode-specific checks against fixed credentials)
//!     → Ok(()) or RejectReason (status code + diagnostic text)
//!
//! Startup:
//!     AuthMode + bound address
//!     → document.rs (credential config printed for the client under test)
//! ```
//!
//! # Design Decisions
//! - The auth mode is chosen once and never changes for a server instance
//! - Credentials are fixed test constants, never real secrets

pub mod document;
pub mod validator;

use std::fmt;

use serde::Serialize;

pub use document::{AuthDocument, DocumentCredentials};
pub use validator::{validate, RejectReason};

/// User name accepted in `basic` mode.
pub const BASIC_USER: &str = "bar";

/// Password accepted in `basic` mode.
pub const BASIC_PASSWORD: &str = "baz";

/// Bearer token accepted in `oauth` mode.
pub const OAUTH_TOKEN: &str = "sometoken";

/// Authentication scheme enforced on GET requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Every request is accepted.
    None,
    /// `Authorization: Basic <base64(user:password)>`.
    Basic,
    /// `Authorization: Bearer <token>`.
    #[value(name = "oauth")]
    OAuth,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::None => "none",
            AuthMode::Basic => "basic",
            AuthMode::OAuth => "oauth",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
