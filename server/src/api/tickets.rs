//! Ticket lifecycle API endpoints.
//!
//! Provides the kiosk-facing ticket operations:
//! - POST /api/v1/tickets - Submit a new ticket
//! - GET /api/v1/tickets/:id - Check status, position, and estimated wait
//! - DELETE /api/v1/tickets/:id - Cancel a ticket

use crate::engine::{DispatchAction, TicketSubmission};
use crate::server::state::AppState;
use crate::types::{Department, RequestId, TicketId, TicketStatus};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kiosk_core::{DateTime, Utc};
use kiosk_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to submit a new ticket.
#[derive(Debug, Deserialize)]
pub struct SubmitTicketRequest {
    /// Department name (e.g., "registrar")
    pub department: String,
    /// Service name or alias (e.g., "Transcript Request" or "transcript")
    pub service: String,
    /// Customer name
    pub name: String,
    /// Phone number or email address
    pub contact: String,
    /// Customer role: student, faculty, staff, alumni, visitor
    pub role: String,
    /// Priority lane: regular, pwd, senior_citizen, pregnant (default regular)
    pub priority: Option<String>,
}

/// Response after submitting a ticket.
#[derive(Debug, Serialize)]
pub struct SubmitTicketResponse {
    /// Created ticket ID (used for status polling and cancellation)
    pub ticket_id: Uuid,
    /// Department the ticket was filed under
    pub department: Department,
    /// Queue number shown on displays
    pub number: u8,
    /// Label of the routed window, absent for shared-line departments
    pub window: Option<String>,
    /// Estimated wait in minutes (tickets ahead x average service time)
    pub estimated_wait_minutes: u32,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

/// Ticket status response.
#[derive(Debug, Serialize)]
pub struct TicketStatusResponse {
    /// Ticket ID
    pub ticket_id: Uuid,
    /// Department
    pub department: Department,
    /// Queue number
    pub number: u8,
    /// Current lifecycle state
    pub status: TicketStatus,
    /// Service name
    pub service: String,
    /// Label of the routed window, if any
    pub window: Option<String>,
    /// 1-based position in the waiting line, absent unless waiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Estimated wait in minutes, absent unless waiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_wait_minutes: Option<u32>,
}

/// Response after cancelling a ticket.
#[derive(Debug, Serialize)]
pub struct CancelTicketResponse {
    /// Cancelled ticket ID
    pub ticket_id: Uuid,
    /// Status after cancellation (always `cancelled`)
    pub status: TicketStatus,
}

// ============================================================================
// Handlers
// ============================================================================

/// Submit a new ticket.
///
/// Validates the customer fields, resolves the service (by name or alias),
/// routes to the least-loaded open window, and allocates the next free
/// queue number in the department's 1-99 cycle.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/tickets \
///   -H "Content-Type: application/json" \
///   -d '{
///     "department": "registrar",
///     "service": "transcript",
///     "name": "Juan dela Cruz",
///     "contact": "juan@example.edu",
///     "role": "student",
///     "priority": "regular"
///   }'
/// ```
///
/// Response:
/// ```json
/// {
///   "ticket_id": "660e8400-e29b-41d4-a716-446655440001",
///   "department": "registrar",
///   "number": 7,
///   "window": "Window 1",
///   "estimated_wait_minutes": 15,
///   "created_at": "2026-03-09T08:00:00Z"
/// }
/// ```
pub async fn submit_ticket(
    State(state): State<AppState>,
    Json(request): Json<SubmitTicketRequest>,
) -> Result<(StatusCode, Json<SubmitTicketResponse>), AppError> {
    let action = DispatchAction::SubmitTicket {
        request_id: RequestId::new(),
        ticket_id: TicketId::new(),
        submission: TicketSubmission {
            department: request.department,
            service: request.service,
            name: request.name,
            contact: request.contact,
            role: request.role,
            priority: request.priority,
        },
    };

    match super::execute(&state, action).await? {
        DispatchAction::TicketAccepted {
            ticket,
            window_label,
            estimated_wait_minutes,
            ..
        } => Ok((
            StatusCode::CREATED,
            Json(SubmitTicketResponse {
                ticket_id: *ticket.id.as_uuid(),
                department: ticket.department,
                number: ticket.number.get(),
                window: window_label,
                estimated_wait_minutes,
                created_at: ticket.created_at,
            }),
        )),
        other => Err(super::unexpected_result(&other)),
    }
}

/// Get ticket status by ID.
///
/// Read-only: answered from the in-memory queue state without going
/// through the command path.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/v1/tickets/660e8400-e29b-41d4-a716-446655440001
/// ```
///
/// Response:
/// ```json
/// {
///   "ticket_id": "660e8400-e29b-41d4-a716-446655440001",
///   "department": "registrar",
///   "number": 7,
///   "status": "waiting",
///   "service": "Transcript Request",
///   "window": "Window 1",
///   "position": 3,
///   "estimated_wait_minutes": 10
/// }
/// ```
pub async fn get_ticket_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketStatusResponse>, AppError> {
    let ticket_id = TicketId::from_uuid(id);

    let found = state
        .store
        .state(move |s| {
            let department = s.find_ticket_department(ticket_id)?;
            let dept = s.department(department);
            let ticket = dept.ticket(ticket_id)?;
            let public = dept.public_projection(ticket);
            Some((ticket.clone(), public, dept.ticket_position(ticket_id)))
        })
        .await;

    let Some((ticket, public, waiting_ahead)) = found else {
        return Err(AppError::not_found("Ticket", id));
    };

    let average = state.config.queue.average_service_minutes;
    let estimated_wait_minutes = waiting_ahead
        .map(|ahead| u32::try_from(ahead).unwrap_or(u32::MAX).saturating_mul(average));

    Ok(Json(TicketStatusResponse {
        ticket_id: id,
        department: ticket.department,
        number: ticket.number.get(),
        status: ticket.status,
        service: public.service,
        window: public.window,
        position: waiting_ahead.map(|ahead| ahead + 1),
        estimated_wait_minutes,
    }))
}

/// Cancel a ticket.
///
/// Releases the queue number back to the department's cycle. Tickets in a
/// terminal state cannot be cancelled again.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/api/v1/tickets/660e8400-e29b-41d4-a716-446655440001
/// ```
pub async fn cancel_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelTicketResponse>, AppError> {
    let action = DispatchAction::CancelTicket {
        request_id: RequestId::new(),
        ticket_id: TicketId::from_uuid(id),
    };

    match super::execute(&state, action).await? {
        DispatchAction::TicketCancelled { ticket_id, .. } => Ok(Json(CancelTicketResponse {
            ticket_id: *ticket_id.as_uuid(),
            status: TicketStatus::Cancelled,
        })),
        other => Err(super::unexpected_result(&other)),
    }
}
