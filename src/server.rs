//! HTTP surface: readiness on `GET /`, deliveries on `POST /` and `POST /webhook`

use crate::error::{Error, Result};
use crate::webhook::{WebhookError, WebhookIngress};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Name shown on the readiness route
pub const APP_NAME: &str = "Pull Request Generator";

/// Shared state for the HTTP handlers
pub struct AppState {
    /// Delivery processing
    pub ingress: WebhookIngress,
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root).post(webhook))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> String {
    format!(
        "{APP_NAME} App up and running! (version {})",
        env!("CARGO_PKG_VERSION")
    )
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<&'static str, WebhookError> {
    state.ingress.handle(&headers, &body).await?;
    Ok("OK")
}

/// Serve `router` on `addr` until Ctrl-C
pub async fn serve(addr: &str, router: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("{APP_NAME} listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("server error: {e}")))?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
