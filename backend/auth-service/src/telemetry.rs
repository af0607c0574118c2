use axum::body::Body;
use axum::http::{HeaderMap, Request};
use tracing::Span;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// JSON logs filtered by `RUST_LOG`
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("auth_service=info,info,sqlx=warn,lapin=warn"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .init();
}

/// Caller-supplied request id, or a fresh one
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Root span of every HTTP request
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request.headers()),
    )
}
