//! Router configuration for the kiosk server.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{metrics_snapshot, readiness_check};
use super::state::AppState;
use crate::api::{admin, departments, tickets, websocket};
use axum::{
    Router,
    routing::{get, post, put},
};
use kiosk_web::{correlation_id_layer, handlers::health_check};

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health, readiness, and metrics (no `/api` prefix)
/// - Kiosk endpoints: ticket submission, status, public queue views
/// - Admin endpoints: window console commands
/// - Per-department WebSocket event streams
///
/// Every request gets a correlation id via [`correlation_id_layer`].
pub fn build_router(state: AppState) -> Router {
    // Kiosk and display endpoints
    let api_routes = Router::new()
        .route("/tickets", post(tickets::submit_ticket))
        .route(
            "/tickets/:id",
            get(tickets::get_ticket_status).delete(tickets::cancel_ticket),
        )
        .route("/departments", get(departments::list_departments))
        .route(
            "/departments/:department/queue",
            get(departments::public_queue_view),
        )
        .route(
            "/departments/:department/events",
            get(websocket::queue_events),
        )
        // Window console commands
        .route("/admin/:department/next", post(admin::call_next))
        .route("/admin/:department/skip", post(admin::skip_next))
        .route("/admin/:department/recall", post(admin::recall))
        .route("/admin/:department/previous", post(admin::previous))
        .route("/admin/:department/stop", post(admin::stop_serving))
        .route("/admin/:department/transfer", post(admin::transfer_ticket))
        .route("/admin/:department/requeue", post(admin::requeue_skipped))
        .route(
            "/admin/:department/windows/:window",
            put(admin::set_window_open),
        );

    Router::new()
        // Operational endpoints (no authentication, no /api prefix)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_snapshot))
        // API routes under versioned prefix
        .nest("/api/v1", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
