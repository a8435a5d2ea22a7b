//! HTTP server mode with an authenticated route

use axum::{middleware, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::middleware::require_auth;

/// Build the router: `/health` is open, `/protected` requires a valid token
pub fn router(auth: Authenticator) -> Router {
    let protected = Router::new()
        .route("/protected", get(protected))
        .route_layer(middleware::from_fn_with_state(auth, require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(auth: Authenticator, port: u16) -> Result<()> {
    let app = router(auth);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Reached only after `require_auth` accepted the request
async fn protected() -> impl IntoResponse {
    Json(json!({ "authenticated": true }))
}
