use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use neomovies_core::types::Timestamp;
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

/// Health check payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"OK"` while the process serves requests.
    pub status: &'static str,
    pub timestamp: Timestamp,
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Seconds since startup.
    pub uptime: u64,
}

/// GET /health -- liveness only; never touches the database or upstreams.
async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        service: "neomovies-api",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
    }))
}

/// Mount the health check. Merged both at the root and under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
