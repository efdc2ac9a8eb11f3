//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{Json, extract::State, http::StatusCode};
use kiosk_core::reducer::Reducer;
use kiosk_runtime::{HealthCheck, HealthStatus, Store};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check dependencies (repository, store).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// JSON body returned by the readiness endpoint.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// Component the check refers to (always `store` here).
    pub component: String,
    /// `healthy`, `degraded`, or `unhealthy`.
    pub status: String,
    /// Human-readable detail when not healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Diagnostic key/value pairs (effect backlog, subscriber count).
    pub metadata: BTreeMap<String, String>,
}

impl From<HealthCheck> for HealthBody {
    fn from(check: HealthCheck) -> Self {
        Self {
            component: check.component,
            status: check.status.to_string(),
            message: check.message,
            metadata: check.metadata.into_iter().collect(),
        }
    }
}

/// Health check with Store diagnostics (for readiness).
///
/// Returns health status based on Store health: the shutdown flag and the
/// pending-effect backlog.
///
/// # Status Codes
///
/// - 200 OK: Healthy or Degraded
/// - 503 Service Unavailable: Unhealthy
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
///
/// # Response
///
/// ```json
/// {
///   "component": "store",
///   "status": "healthy",
///   "metadata": {
///     "pending_effects": "0",
///     "effect_limit": "1000",
///     "subscribers": "3"
///   }
/// }
/// ```
pub async fn health_check_with_store<S, A, E, R>(
    State(store): State<Arc<Store<S, A, E, R>>>,
) -> (StatusCode, Json<HealthBody>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Send + Clone + 'static,
    E: Send + Sync + 'static,
{
    let health = store.health();

    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(health.into()))
}
