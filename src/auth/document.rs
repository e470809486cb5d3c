//! Credential config printed at startup.
//!
//! The client under test reads this document to learn which domain the
//! credentials apply to and what to send.

use std::net::SocketAddr;

use serde::Serialize;

use super::{AuthMode, BASIC_PASSWORD, BASIC_USER, OAUTH_TOKEN};

/// Auth config document in the format the fetching client consumes.
#[derive(Debug, Clone, Serialize)]
pub struct AuthDocument {
    #[serde(rename = "rktKind")]
    pub kind: &'static str,
    #[serde(rename = "rktVersion")]
    pub version: &'static str,
    pub domains: Vec<String>,
    #[serde(rename = "type")]
    pub auth_type: AuthMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<DocumentCredentials>,
}

/// Mode-specific credential block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentCredentials {
    Basic { user: String, password: String },
    OAuth { token: String },
}

impl AuthDocument {
    /// Build the document for a server listening on `addr`.
    pub fn new(mode: AuthMode, addr: SocketAddr) -> Self {
        let credentials = match mode {
            AuthMode::None => None,
            AuthMode::Basic => Some(DocumentCredentials::Basic {
                user: BASIC_USER.to_string(),
                password: BASIC_PASSWORD.to_string(),
            }),
            AuthMode::OAuth => Some(DocumentCredentials::OAuth {
                token: OAUTH_TOKEN.to_string(),
            }),
        };

        Self {
            kind: "auth",
            version: "v1",
            domains: vec![addr.to_string()],
            auth_type: mode,
            credentials,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
