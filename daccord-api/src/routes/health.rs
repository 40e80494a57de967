/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// { "status": "healthy", "version": "0.1.0", "storage": "postgres", "storage_status": "connected" }
/// ```
///
/// Always answers 200; a failed storage probe shows up as `degraded`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    pub version: String,

    /// Backend name (`postgres` or `memory`)
    pub storage: String,

    pub storage_status: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if reachable { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store.backend().to_string(),
        storage_status: if reachable { "connected" } else { "disconnected" }.to_string(),
    })
}
