use axum::body::Body;
use axum::http::Request;
use tracing::{Span, info_span};
use uuid::Uuid;

/// Per-request span carrying a fresh request id.
pub fn request_span(request: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    )
}
