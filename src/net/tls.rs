//! TLS configuration with a throwaway self-signed certificate.

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

/// Errors raised while preparing the listener's TLS configuration.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to generate self-signed certificate: {0}")]
    Generate(#[from] rcgen::Error),

    #[error("failed to load certificate into rustls: {0}")]
    Load(#[source] std::io::Error),
}

/// Generate a fresh self-signed certificate for `hostnames` and wrap it in
/// a rustls server config.
///
/// Clients are expected to skip peer verification; the certificate only
/// exists so the handshake can happen.
pub async fn self_signed_config(hostnames: &[String]) -> Result<RustlsConfig, TlsError> {
    let rcgen::CertifiedKey { cert, key_pair } = rcgen::generate_simple_self_signed(hostnames.to_vec())?;

    tracing::debug!(hostnames = ?hostnames, "Generated self-signed certificate");

    RustlsConfig::from_pem(cert.pem().into_bytes(), key_pair.serialize_pem().into_bytes())
        .await
        .map_err(TlsError::Load)
}
