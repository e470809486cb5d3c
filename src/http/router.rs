//! Request dispatch by method and path.
//!
//! # Responsibilities
//! - POST anywhere: answer 200 and fire the shutdown signal
//! - GET: check credentials, then serve `prog.aci` or answer 404
//! - Anything else: 405
//! - Emit diagnostic lines for every GET
//!
//! # Design Decisions
//! - Holds only handles to the other components; the auth mode is immutable
//! - A request's diagnostics are emitted sequentially from its own task
//! - Build errors go to the diagnostic stream, never to the response body

use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::artifact::{ArtifactBuilder, BuildError};
use crate::auth::{self, AuthMode};
use crate::http::request::request_id;
use crate::lifecycle::{Diagnostics, ShutdownTrigger};

/// Final path segment that serves the built image.
pub const ARTIFACT_NAME: &str = "prog.aci";

/// Dispatches requests for one server instance.
#[derive(Clone)]
pub struct RequestRouter {
    mode: AuthMode,
    builder: Arc<dyn ArtifactBuilder>,
    diagnostics: Diagnostics,
    shutdown: ShutdownTrigger,
}

impl RequestRouter {
    pub fn new(
        mode: AuthMode,
        builder: Arc<dyn ArtifactBuilder>,
        diagnostics: Diagnostics,
        shutdown: ShutdownTrigger,
    ) -> Self {
        Self {
            mode,
            builder,
            diagnostics,
            shutdown,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Handle one request and produce its response.
    pub async fn handle(&self, method: &Method, uri: &Uri, headers: &HeaderMap) -> Response {
        let id = request_id(headers);

        if method == Method::POST {
            tracing::info!(request_id = %id, path = %uri.path(), "Shutdown requested");
            self.shutdown.trigger();
            return StatusCode::OK.into_response();
        }
        if method != Method::GET {
            tracing::debug!(request_id = %id, method = %method, "Method not allowed");
            return StatusCode::METHOD_NOT_ALLOWED.into_response();
        }

        if let Err(reason) = auth::validate(self.mode, headers) {
            tracing::warn!(
                request_id = %id,
                mode = %self.mode,
                status = reason.status().as_u16(),
                reason = %reason,
                "Request rejected"
            );
            self.diagnostics
                .emit(format!("[{id}] GET {uri} rejected: {reason}"))
                .await;
            return reason.status().into_response();
        }

        if final_segment(&decode_path(uri.path())) == ARTIFACT_NAME {
            self.serve_artifact(id, uri).await
        } else {
            tracing::debug!(request_id = %id, path = %uri.path(), "Not found");
            self.diagnostics.emit(format!("[{id}] not found: {uri}")).await;
            StatusCode::NOT_FOUND.into_response()
        }
    }

    async fn serve_artifact(&self, id: &str, uri: &Uri) -> Response {
        self.diagnostics.emit(format!("[{id}] serving {uri}")).await;

        let builder = self.builder.clone();
        let result = match tokio::task::spawn_blocking(move || builder.build()).await {
            Ok(result) => result,
            Err(e) => Err(BuildError::Panicked(e.to_string())),
        };

        match result {
            Ok(image) => {
                tracing::info!(request_id = %id, bytes = image.len(), "Image served");
                self.diagnostics
                    .emit(format!("[{id}]   done ({} bytes)", image.len()))
                    .await;
                (StatusCode::OK, image).into_response()
            }
            Err(e) => {
                tracing::error!(request_id = %id, error = %e, "Image build failed");
                self.diagnostics.emit(format!("[{id}]   failed ({e})")).await;
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Percent-decode a request path; `%2F` becomes a separator.
fn decode_path(path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
}

/// Last segment of a URL path, ignoring trailing slashes.
fn final_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, last)) => last,
        None => trimmed,
    }
}
