//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all handler
//! - Wire up middleware (request ID, tracing)
//! - Hand every request to the RequestRouter

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    routing::any,
    Router,
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::request::MakeShortRequestId;
use crate::http::router::RequestRouter;

/// Build the Axum app serving every method on every path.
pub fn build_app(router: RequestRouter) -> Router {
    Router::new()
        .route("/{*path}", any(route_request))
        .route("/", any(route_request))
        .with_state(router)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeShortRequestId))
}

async fn route_request(
    State(router): State<RequestRouter>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    router.handle(&method, &uri, &headers).await
}
