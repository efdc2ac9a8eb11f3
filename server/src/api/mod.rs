//! API endpoints for the kiosk system.
//!
//! This module contains all HTTP API handlers organized by audience:
//! - Tickets: kiosk submission, status lookup, cancellation
//! - Departments: kiosk catalog and public queue views
//! - Admin: window console commands (next/skip/recall/previous/stop/...)
//! - WebSocket: per-department real-time event streams
//!
//! Every mutating handler follows the same shape: build a command action
//! with a fresh [`RequestId`], send it through the store, and wait for the
//! result action carrying the same id. Rejections come back as
//! `CommandRejected` and map onto HTTP status codes here.

pub mod admin;
pub mod departments;
pub mod tickets;
pub mod websocket;

pub use admin::{
    call_next, previous, recall, requeue_skipped, set_window_open, skip_next, stop_serving,
    transfer_ticket,
};
pub use departments::{list_departments, public_queue_view};
pub use tickets::{cancel_ticket, get_ticket_status, submit_ticket};
pub use websocket::queue_events;

use crate::engine::DispatchAction;
use crate::error::DispatchError;
use crate::server::state::AppState;
use crate::types::Department;
use kiosk_runtime::StoreError;
use kiosk_web::AppError;

/// Send one command through the store and wait for its result action.
///
/// Returns the result action on success; `CommandRejected` is unwrapped
/// into the matching [`AppError`] here so handlers only match on the
/// success variants they expect.
pub(crate) async fn execute(
    state: &AppState,
    action: DispatchAction,
) -> Result<DispatchAction, AppError> {
    let request_id = action.request_id();
    let result = state
        .store
        .send_and_wait_for(
            action,
            move |candidate| candidate.request_id() == request_id && candidate.is_result(),
            state.config.command_timeout(),
        )
        .await
        .map_err(store_error)?;

    match result {
        DispatchAction::CommandRejected { error, .. } => Err(dispatch_error(error)),
        other => Ok(other),
    }
}

/// Map a domain rejection onto its HTTP status.
pub(crate) fn dispatch_error(error: DispatchError) -> AppError {
    match error {
        DispatchError::Validation { message } => AppError::bad_request(message),
        DispatchError::NotFound { resource, id } => AppError::not_found(resource, id),
        error @ DispatchError::ExhaustedRange { .. } => AppError::unavailable(error.to_string()),
        error @ (DispatchError::NoWindowAvailable { .. } | DispatchError::InvalidTransfer { .. }) => {
            AppError::conflict(error.to_string())
        }
    }
}

/// Map a store failure onto its HTTP status.
pub(crate) fn store_error(error: StoreError) -> AppError {
    match error {
        StoreError::Timeout => AppError::timeout("the command did not resolve in time"),
        StoreError::ShutdownInProgress | StoreError::ChannelClosed => {
            AppError::unavailable("the server is shutting down")
        }
        error @ StoreError::ShutdownTimeout(_) => AppError::internal(error.to_string()),
    }
}

/// A result action of a kind the command cannot produce.
pub(crate) fn unexpected_result(action: &DispatchAction) -> AppError {
    AppError::internal(format!("unexpected result action: {action:?}"))
}

/// Resolve a department path segment, 404 on unknown names.
pub(crate) fn parse_department(raw: &str) -> Result<Department, AppError> {
    Department::from_name(raw).ok_or_else(|| AppError::not_found("Department", raw))
}
