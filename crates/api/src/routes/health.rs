use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether an occupancy snapshot has ever loaded successfully.
    pub snapshot_loaded: bool,
    /// Number of spots currently claimed, if the registry answered.
    pub active_claims: Option<usize>,
}

/// GET / -- plain-text liveness banner.
async fn banner() -> &'static str {
    "Stables API running..."
}

/// GET /health -- returns service, snapshot and registry health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot_loaded = state.snapshots.last_good().is_some();
    let active_claims = state.claims.count().await.ok();

    let status = if snapshot_loaded && active_claims.is_some() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        snapshot_loaded,
        active_claims,
    })
}

/// Mount the banner and health check routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}
