//! Startup and teardown of the TLS server.
//!
//! # Responsibilities
//! - Generate the certificate and bind the TLS listener
//! - Build the request router bound to the auth mode
//! - Serve connections on a background task
//! - Stop: close the listener, drain in-flight requests, await the task
//!
//! # Design Decisions
//! - Fail fast: certificate and bind errors abort startup
//! - `start` returns only once the listener is bound
//! - `stop` consumes the handle, so a server cannot be stopped twice

use std::io::Write;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::artifact::ArtifactBuilder;
use crate::auth::{AuthDocument, AuthMode};
use crate::config::FixtureConfig;
use crate::http::{build_app, RequestRouter};
use crate::lifecycle::diagnostics::{diagnostic_channel, DiagnosticStream};
use crate::lifecycle::shutdown::{shutdown_channel, ShutdownSignal};
use crate::net::tls::{self_signed_config, TlsError};

/// Fatal errors raised before any request is served.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while tearing the server down.
#[derive(Debug, Error)]
pub enum StopError {
    #[error("server task failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("server task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Event observed by the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A request asked the server to stop.
    Shutdown,
    /// A request produced a diagnostic line.
    Diagnostic(String),
}

/// A running server.
///
/// Owns the receiving ends of the shutdown and diagnostic channels; the
/// router owns the sending ends.
pub struct ServerHandle {
    mode: AuthMode,
    local_addr: SocketAddr,
    drain_timeout: Option<Duration>,
    handle: axum_server::Handle,
    task: JoinHandle<std::io::Result<()>>,
    shutdown: ShutdownSignal,
    diagnostics: DiagnosticStream,
}

/// Start a server for `mode` that builds images with `builder`.
pub async fn start(
    mode: AuthMode,
    config: &FixtureConfig,
    builder: Arc<dyn ArtifactBuilder>,
) -> Result<ServerHandle, StartupError> {
    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|source| StartupError::Address {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let tls = self_signed_config(&config.listener.hostnames).await?;

    let (diagnostics_tx, diagnostics) = diagnostic_channel();
    let (trigger, shutdown) = shutdown_channel();
    let app = build_app(RequestRouter::new(mode, builder, diagnostics_tx, trigger));

    let handle = axum_server::Handle::new();
    let server = axum_server::bind_rustls(addr, tls).handle(handle.clone());
    let task = tokio::spawn(async move { server.serve(app.into_make_service()).await });

    // `listening` resolves to None when the serve task failed to bind.
    let Some(local_addr) = handle.listening().await else {
        return Err(StartupError::Bind {
            addr,
            source: bind_failure(task.await),
        });
    };

    tracing::info!(address = %local_addr, mode = %mode, "Test server listening");

    Ok(ServerHandle {
        mode,
        local_addr,
        drain_timeout: config.shutdown.drain_timeout(),
        handle,
        task,
        shutdown,
        diagnostics,
    })
}

fn bind_failure(result: Result<std::io::Result<()>, tokio::task::JoinError>) -> std::io::Error {
    match result {
        Ok(Err(e)) => e,
        Ok(Ok(())) => std::io::Error::other("server exited before listening"),
        Err(e) => std::io::Error::other(e),
    }
}

impl ServerHandle {
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL clients connect to.
    pub fn url(&self) -> String {
        format!("https://{}", self.local_addr)
    }

    /// Print the credential config and the ready line.
    pub fn announce<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let document = AuthDocument::new(self.mode, self.local_addr);
        let json = document.to_json_pretty().map_err(std::io::Error::other)?;
        writeln!(out, "{}", json)?;
        writeln!(out)?;
        writeln!(out, "Ready, waiting for connections at {}", self.url())?;
        out.flush()
    }

    /// Wait for the next shutdown or diagnostic event.
    pub async fn next_event(&mut self) -> ControlEvent {
        tokio::select! {
            _ = self.shutdown.recv() => ControlEvent::Shutdown,
            Some(line) = self.diagnostics.recv() => ControlEvent::Diagnostic(line),
        }
    }

    /// Diagnostic lines already queued, without waiting.
    pub fn pending_diagnostics(&mut self) -> Vec<String> {
        self.diagnostics.drain_pending()
    }

    /// Stop accepting, drain in-flight requests and wait for the server task.
    ///
    /// Diagnostics produced by requests still draining are logged, not
    /// printed.
    pub async fn stop(self) -> Result<(), StopError> {
        let ServerHandle {
            local_addr,
            drain_timeout,
            handle,
            mut task,
            mut diagnostics,
            ..
        } = self;

        tracing::info!(address = %local_addr, drain_timeout = ?drain_timeout, "Stopping test server");
        handle.graceful_shutdown(drain_timeout);

        let result = loop {
            tokio::select! {
                result = &mut task => break result,
                Some(line) = diagnostics.recv() => {
                    tracing::info!(diagnostic = %line, "Diagnostic during shutdown");
                }
            }
        };

        result?.map_err(StopError::Serve)?;
        tracing::info!(address = %local_addr, "Test server stopped");
        Ok(())
    }
}
