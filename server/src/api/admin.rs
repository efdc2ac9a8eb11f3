//! Window console API endpoints.
//!
//! Staff-facing commands addressed to a scope (department + optional
//! window):
//! - POST /api/v1/admin/:department/next - Call the next ticket
//! - POST /api/v1/admin/:department/skip - Park the head ticket as skipped
//! - POST /api/v1/admin/:department/recall - Re-announce the serving ticket
//! - POST /api/v1/admin/:department/previous - Step the display back
//! - POST /api/v1/admin/:department/stop - Finish the serving ticket
//! - POST /api/v1/admin/:department/transfer - Move a ticket to another window
//! - POST /api/v1/admin/:department/requeue - Return a skipped ticket to the line
//! - PUT /api/v1/admin/:department/windows/:window - Open or close a window
//!
//! Every command resolves with the full admin snapshot of the commanded
//! scope, customer fields included. These endpoints sit behind the staff
//! network; they carry no per-request authentication.

use crate::engine::{DispatchAction, ScopeSnapshot};
use crate::server::state::AppState;
use crate::types::{RequestId, Scope, TicketId, Window};
use axum::{
    Json,
    extract::{Path, State},
};
use kiosk_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Request Types
// ============================================================================

/// Scope selector carried by most console commands.
///
/// `{}` addresses the department's shared line; `{"window": 2}` addresses
/// one window's line.
#[derive(Debug, Deserialize)]
pub struct ScopeBody {
    /// Window number within the department
    pub window: Option<u8>,
}

/// Body for the transfer command.
#[derive(Debug, Deserialize)]
pub struct TransferBody {
    /// Window number the command is issued from
    pub window: Option<u8>,
    /// Ticket to move
    pub ticket_id: Uuid,
    /// Window number the ticket should move to
    pub target_window: u8,
}

/// Body for the requeue command.
#[derive(Debug, Deserialize)]
pub struct RequeueBody {
    /// Window number the command is issued from
    pub window: Option<u8>,
    /// Skipped ticket to return to the waiting line
    pub ticket_id: Uuid,
}

/// Body for the window open/close toggle.
#[derive(Debug, Deserialize)]
pub struct SetWindowOpenBody {
    /// New open state
    pub open: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Call the next waiting ticket in the scope.
///
/// Implicitly completes the ticket currently being served, then promotes
/// the head of the line (priority lane first) to `serving`.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/admin/registrar/next \
///   -H "Content-Type: application/json" \
///   -d '{"window": 1}'
/// ```
pub async fn call_next(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<ScopeBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::CallNext {
            request_id: RequestId::new(),
            scope,
        },
    )
    .await
}

/// Park the head waiting ticket as skipped.
///
/// The customer did not come forward; the ticket moves to the scope's
/// skipped list and can be requeued later.
pub async fn skip_next(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<ScopeBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::Skip {
            request_id: RequestId::new(),
            scope,
        },
    )
    .await
}

/// Re-announce the ticket currently being served.
///
/// Publishes a fresh queue update so displays flash the serving number
/// again. No state changes and nothing is persisted.
pub async fn recall(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<ScopeBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::Recall {
            request_id: RequestId::new(),
            scope,
        },
    )
    .await
}

/// Step the displayed number back by one.
///
/// Display-only correction for an accidental double-press of "next"; the
/// number wraps 1 back to 99. Ticket statuses are untouched.
pub async fn previous(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<ScopeBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::Previous {
            request_id: RequestId::new(),
            scope,
        },
    )
    .await
}

/// Finish the ticket currently being served without calling another.
///
/// Idempotent: stopping an idle scope still resolves with its snapshot.
pub async fn stop_serving(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<ScopeBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::Stop {
            request_id: RequestId::new(),
            scope,
        },
    )
    .await
}

/// Move a waiting or serving ticket to another window's line.
///
/// The target window must be assigned the ticket's service; the ticket
/// joins the tail of its priority band there as `waiting`.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/admin/registrar/transfer \
///   -H "Content-Type: application/json" \
///   -d '{"window": 1, "ticket_id": "660e8400-e29b-41d4-a716-446655440001", "target_window": 2}'
/// ```
pub async fn transfer_ticket(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<TransferBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::Transfer {
            request_id: RequestId::new(),
            scope,
            ticket_id: TicketId::from_uuid(body.ticket_id),
            target_window: body.target_window,
        },
    )
    .await
}

/// Return a skipped ticket to the tail of its priority band.
pub async fn requeue_skipped(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(body): Json<RequeueBody>,
) -> Result<Json<ScopeSnapshot>, AppError> {
    let scope = scope(&department, body.window)?;
    scope_command(
        &state,
        DispatchAction::RequeueSkipped {
            request_id: RequestId::new(),
            scope,
            ticket_id: TicketId::from_uuid(body.ticket_id),
        },
    )
    .await
}

/// Open or close a window.
///
/// Closed windows stop receiving routed submissions; tickets already in
/// their line stay put and can still be called or transferred away.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:8080/api/v1/admin/registrar/windows/2 \
///   -H "Content-Type: application/json" \
///   -d '{"open": false}'
/// ```
pub async fn set_window_open(
    State(state): State<AppState>,
    Path((department, window)): Path<(String, u8)>,
    Json(body): Json<SetWindowOpenBody>,
) -> Result<Json<Window>, AppError> {
    let department = super::parse_department(&department)?;
    let action = DispatchAction::SetWindowOpen {
        request_id: RequestId::new(),
        department,
        window,
        open: body.open,
    };

    match super::execute(&state, action).await? {
        DispatchAction::WindowUpdated { window, .. } => Ok(Json(window)),
        other => Err(super::unexpected_result(&other)),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the commanded scope from the path department and body window.
fn scope(department: &str, window: Option<u8>) -> Result<Scope, AppError> {
    let department = super::parse_department(department)?;
    Ok(Scope { department, window })
}

/// Run one scope command and unwrap its snapshot resolution.
async fn scope_command(
    state: &AppState,
    action: DispatchAction,
) -> Result<Json<ScopeSnapshot>, AppError> {
    match super::execute(state, action).await? {
        DispatchAction::QueueChanged { snapshot, .. } => Ok(Json(snapshot)),
        other => Err(super::unexpected_result(&other)),
    }
}
