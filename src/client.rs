//! Client side of the shutdown protocol.
//!
//! Any POST stops a running fixture; this sends one with certificate
//! verification disabled, since the fixture's certificate is self-signed.

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("failed to send post to {url:?}: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client that accepts the fixture's self-signed certificate.
pub fn insecure_client() -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(ClientError::Build)
}

/// POST to `url` and return the response status.
pub async fn request_stop(url: &str) -> Result<StatusCode, ClientError> {
    let parsed = Url::parse(url).map_err(|source| ClientError::Url {
        url: url.to_string(),
        source,
    })?;

    let response = insecure_client()?
        .post(parsed)
        .send()
        .await
        .map_err(|source| ClientError::Send {
            url: url.to_string(),
            source,
        })?;

    tracing::debug!(url = %url, status = %response.status(), "Stop request answered");
    Ok(response.status())
}
