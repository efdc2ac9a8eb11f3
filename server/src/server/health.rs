//! Health and metrics endpoints for the kiosk server.
//!
//! Liveness is `kiosk_web::handlers::health_check`; this module adds the
//! readiness probe (store diagnostics) and the Prometheus scrape route.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use kiosk_runtime::HealthStatus;
use kiosk_web::handlers::health::HealthBody;

/// Readiness check endpoint.
///
/// Reports the dispatch store's health: the shutdown flag and the
/// pending-effect backlog.
///
/// # Status Codes
///
/// - 200 OK: Healthy or Degraded
/// - 503 Service Unavailable: Unhealthy
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"component":"store","status":"healthy","metadata":{"pending_effects":"0",...}}
/// ```
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    let health = state.store.health();

    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(health.into()))
}

/// Prometheus scrape endpoint.
///
/// Renders the current metrics snapshot. Returns 503 if the recorder was
/// never installed (another recorder claimed the global slot).
pub async fn metrics_snapshot(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .render()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}
