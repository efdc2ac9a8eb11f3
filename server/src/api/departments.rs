//! Department catalog and public queue view endpoints.
//!
//! Public (unauthenticated) reads used by kiosk terminals and display
//! boards:
//! - GET /api/v1/departments - Catalog of departments, services, and windows
//! - GET /api/v1/departments/:department/queue - Sanitized queue view

use crate::engine::QueueSnapshot;
use crate::server::state::AppState;
use crate::types::Department;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use kiosk_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct DepartmentsResponse {
    /// All configured departments
    pub departments: Vec<DepartmentView>,
}

/// One department in the catalog.
#[derive(Debug, Serialize)]
pub struct DepartmentView {
    /// Department name
    pub department: Department,
    /// Services the kiosk can offer for this department
    pub services: Vec<ServiceView>,
    /// Service windows; empty for shared-line departments
    pub windows: Vec<WindowView>,
}

/// One service on the kiosk menu.
#[derive(Debug, Serialize)]
pub struct ServiceView {
    /// Service ID
    pub id: Uuid,
    /// Canonical display name
    pub name: String,
    /// Menu grouping label
    pub category: String,
    /// Estimated processing time in minutes
    pub estimated_minutes: u32,
}

/// One window in the catalog.
#[derive(Debug, Serialize)]
pub struct WindowView {
    /// Small number staff and signage refer to
    pub number: u8,
    /// Display label
    pub label: String,
    /// Whether the window currently receives routed submissions
    pub open: bool,
    /// Staff member currently assigned, if any
    pub operator: Option<String>,
}

/// Query parameters for the public queue view.
#[derive(Debug, Deserialize)]
pub struct QueueViewQuery {
    /// Restrict the view to one window's line
    pub window: Option<u8>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List departments with their services and windows.
///
/// This is the kiosk's menu: the submission form is built from it.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/v1/departments
/// ```
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<DepartmentsResponse>, AppError> {
    let departments = state
        .store
        .state(|s| {
            s.departments()
                .map(|dept| DepartmentView {
                    department: dept.department(),
                    services: dept
                        .services()
                        .iter()
                        .map(|service| ServiceView {
                            id: *service.id.as_uuid(),
                            name: service.name.clone(),
                            category: service.category.clone(),
                            estimated_minutes: service.estimated_minutes,
                        })
                        .collect(),
                    windows: dept
                        .windows()
                        .map(|window| WindowView {
                            number: window.number,
                            label: window.label.clone(),
                            open: window.open,
                            operator: window.operator.clone(),
                        })
                        .collect(),
                })
                .collect()
        })
        .await;

    Ok(Json(DepartmentsResponse { departments }))
}

/// Public queue view for a department.
///
/// Returns only public-safe ticket fields (queue number, service name,
/// priority lane, window label) - never customer name or contact.
///
/// - `?window=N` narrows the view to one window's line.
/// - Without `window`, a windowed department returns the merged waiting
///   list across all of its lines; a shared-line department returns its
///   single line including the serving entry and displayed number.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/v1/departments/registrar/queue?window=1"
/// ```
///
/// Response:
/// ```json
/// {
///   "department": "registrar",
///   "window": 1,
///   "window_label": "Window 1",
///   "waiting": [{"number": 8, "service": "Transcript Request", "priority": "regular", "window": "Window 1"}],
///   "serving": {"number": 7, "service": "Transcript Request", "priority": "pwd", "window": "Window 1"},
///   "displayed": 7
/// }
/// ```
pub async fn public_queue_view(
    State(state): State<AppState>,
    Path(department): Path<String>,
    Query(query): Query<QueueViewQuery>,
) -> Result<Json<QueueSnapshot>, AppError> {
    let department = super::parse_department(&department)?;
    let window = query.window;

    let snapshot = state
        .store
        .state(move |s| {
            let dept = s.department(department);
            match window {
                Some(_) => {
                    let key = dept.resolve_window_key(window)?;
                    Ok(dept.public_snapshot(key))
                }
                None if dept.has_windows() => Ok(dept.department_overview()),
                None => Ok(dept.public_snapshot(None)),
            }
        })
        .await
        .map_err(super::dispatch_error)?;

    Ok(Json(snapshot))
}
