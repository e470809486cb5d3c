//! Credential validation for GET requests.
//!
//! # Responsibilities
//! - Extract the `Authorization` payload for the scheme the mode requires
//! - Compare the payload against the fixed test credentials
//! - Map every rejection to a status code and a diagnostic reason
//!
//! # Design Decisions
//! - Pure function: (AuthMode, headers) → Result<(), RejectReason>
//! - Header shape problems are 400, missing or wrong credentials are 401

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::{AuthMode, BASIC_PASSWORD, BASIC_USER, OAUTH_TOKEN};

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// No `Authorization` header, or an empty one.
    #[error("no \"Authorization\" header")]
    MissingHeader,

    /// The header is not `<scheme> <payload>`.
    #[error("malformed \"Authorization\" header")]
    MalformedHeader,

    /// The header uses a scheme other than the one the mode requires.
    #[error("wrong auth scheme, expected {expected}")]
    WrongScheme { expected: &'static str },

    /// Basic payload is not valid base64.
    #[error("badly formed \"Authorization\" header: payload is not base64")]
    InvalidBase64,

    /// Decoded basic payload is not exactly `user:password`.
    #[error("badly formed \"Authorization\" header: expected user:password")]
    MalformedCredentials,

    /// User or password do not match.
    #[error("bad credentials: {0:?}")]
    BadCredentials(String),

    /// Bearer token does not match.
    #[error("bad token: {0:?}")]
    BadToken(String),
}

impl RejectReason {
    /// Status code written back to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            RejectReason::MalformedHeader
            | RejectReason::InvalidBase64
            | RejectReason::MalformedCredentials => StatusCode::BAD_REQUEST,
            RejectReason::MissingHeader
            | RejectReason::WrongScheme { .. }
            | RejectReason::BadCredentials(_)
            | RejectReason::BadToken(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Check the request headers against the credentials of `mode`.
pub fn validate(mode: AuthMode, headers: &HeaderMap) -> Result<(), RejectReason> {
    match mode {
        AuthMode::None => Ok(()),
        AuthMode::Basic => {
            let payload = auth_payload(headers, "Basic")?;
            let decoded = STANDARD
                .decode(payload)
                .map_err(|_| RejectReason::InvalidBase64)?;

            let fields: Vec<&[u8]> = decoded.split(|b| *b == b':').collect();
            if fields.len() != 2 {
                return Err(RejectReason::MalformedCredentials);
            }

            if fields[0] != BASIC_USER.as_bytes() || fields[1] != BASIC_PASSWORD.as_bytes() {
                return Err(RejectReason::BadCredentials(
                    String::from_utf8_lossy(&decoded).into_owned(),
                ));
            }
            Ok(())
        }
        AuthMode::OAuth => {
            let payload = auth_payload(headers, "Bearer")?;
            if payload != OAUTH_TOKEN.as_bytes() {
                return Err(RejectReason::BadToken(
                    String::from_utf8_lossy(payload).into_owned(),
                ));
            }
            Ok(())
        }
    }
}

/// Return the payload of an `Authorization: <scheme> <payload>` header.
///
/// Works on raw bytes: header values may carry non-ASCII octets, which are
/// simply credentials that do not match.
fn auth_payload<'a>(headers: &'a HeaderMap, scheme: &'static str) -> Result<&'a [u8], RejectReason> {
    let value = match headers.get(AUTHORIZATION) {
        Some(v) if !v.is_empty() => v.as_bytes(),
        _ => return Err(RejectReason::MissingHeader),
    };

    // Single spaces only: "Basic  abc" has three parts and is malformed.
    let parts: Vec<&[u8]> = value.split(|b| *b == b' ').collect();
    if parts.len() != 2 {
        return Err(RejectReason::MalformedHeader);
    }
    if parts[0] != scheme.as_bytes() {
        return Err(RejectReason::WrongScheme { expected: scheme });
    }
    Ok(parts[1])
}
