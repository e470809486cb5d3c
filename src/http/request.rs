//! Request identification.
//!
//! # Responsibilities
//! - Generate a short request ID for every incoming request
//! - Read it back in handlers for diagnostics and log fields
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Eight hex characters of a UUID v4: enough to tell concurrent requests apart
//! - A client-supplied `x-request-id` is kept as is

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates short UUID-derived request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeShortRequestId;

impl MakeRequestId for MakeShortRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().simple().to_string();
        HeaderValue::from_str(&id[..8]).ok().map(RequestId::new)
    }
}

/// Request ID of a request, or `-` when none is present.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_ids_are_short_and_distinct() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let mut maker = MakeShortRequestId;

        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_eq!(a.header_value().len(), 8);
        assert_ne!(a.header_value(), b.header_value());
    }

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "-");

        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abcd1234"));
        assert_eq!(request_id(&headers), "abcd1234");
    }
}
