/// Route definitions and middleware setup
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{health_check, sign_in, sign_out, sign_up, status};
use crate::telemetry::request_span;
use crate::AppState;

/// Build the REST router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/signUp", post(sign_up))
        .route("/auth/signIn", post(sign_in))
        .route("/auth/signOut", post(sign_out))
        .route("/status", get(status))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Serve the router until `shutdown` resolves
pub async fn start_http_server(
    state: AppState,
    host: &str,
    port: u16,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting HTTP API server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
