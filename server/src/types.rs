//! Domain types for the kiosk queue backend.
//!
//! Value objects, entities, and enumerations shared by the dispatch engine,
//! the repository, and the HTTP layer. Departments, services, and windows are
//! reference data managed by external admin tooling; tickets are the central
//! mutable entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a queue ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a service window
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(Uuid);

impl WindowId {
    /// Creates a new random `WindowId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `WindowId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a service
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceId(Uuid);

impl ServiceId {
    /// Creates a new random `ServiceId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ServiceId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates a command with the result event that answers it.
///
/// Every command action carries a fresh `RequestId`; the handler that sent it
/// waits for the result action with the matching id on the action broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random `RequestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RequestId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Queue number outside the valid 1-99 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue number {0} is outside the range 1-99")]
pub struct QueueNumberOutOfRange(pub u8);

/// A ticket's position number on the display boards.
///
/// Numbers are drawn from 1-99 inclusive and cycle: after 99 the sequence
/// wraps back to 1. A number is unique among the non-terminal tickets of its
/// department.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QueueNumber(u8);

impl QueueNumber {
    /// Lowest number in the cycle.
    pub const MIN: Self = Self(1);

    /// Highest number in the cycle.
    pub const MAX: Self = Self(99);

    /// Create a queue number, validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`QueueNumberOutOfRange`] if `value` is 0 or greater than 99.
    pub const fn new(value: u8) -> Result<Self, QueueNumberOutOfRange> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Ok(Self(value))
        } else {
            Err(QueueNumberOutOfRange(value))
        }
    }

    /// Get the raw number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The number after this one, wrapping 99 back to 1.
    #[must_use]
    pub const fn wrapping_next(self) -> Self {
        if self.0 >= Self::MAX.0 {
            Self::MIN
        } else {
            Self(self.0 + 1)
        }
    }

    /// The number before this one, wrapping 1 back to 99.
    #[must_use]
    pub const fn wrapping_prev(self) -> Self {
        if self.0 <= Self::MIN.0 {
            Self::MAX
        } else {
            Self(self.0 - 1)
        }
    }
}

impl TryFrom<u8> for QueueNumber {
    type Error = QueueNumberOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QueueNumber> for u8 {
    fn from(number: QueueNumber) -> Self {
        number.get()
    }
}

impl fmt::Display for QueueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// The departments served by the kiosk.
///
/// Each department scopes its own numbering cycle, windows, and services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Registrar's office (records, enrollment, transcripts)
    Registrar,
    /// Admissions office
    Admissions,
    /// Cashier (payments and fees)
    Cashier,
}

impl Department {
    /// All departments, in display order.
    pub const ALL: [Self; 3] = [Self::Registrar, Self::Admissions, Self::Cashier];

    /// Wire/display name of the department.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registrar => "registrar",
            Self::Admissions => "admissions",
            Self::Cashier => "cashier",
        }
    }

    /// Parse a department from its wire name (case-insensitive, trimmed).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "registrar" => Some(Self::Registrar),
            "admissions" => Some(Self::Admissions),
            "cashier" => Some(Self::Cashier),
            _ => None,
        }
    }

    /// Position of the department in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Registrar => 0,
            Self::Admissions => 1,
            Self::Cashier => 2,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The customer's relationship to the university.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerRole {
    /// Currently enrolled student
    Student,
    /// Teaching faculty
    Faculty,
    /// Non-teaching staff
    Staff,
    /// Former student
    Alumni,
    /// Anyone else
    Visitor,
}

impl CustomerRole {
    /// Parse a role from its wire name (case-insensitive, trimmed).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "faculty" => Some(Self::Faculty),
            "staff" => Some(Self::Staff),
            "alumni" => Some(Self::Alumni),
            "visitor" => Some(Self::Visitor),
            _ => None,
        }
    }

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Staff => "staff",
            Self::Alumni => "alumni",
            Self::Visitor => "visitor",
        }
    }
}

impl fmt::Display for CustomerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lane priority of a ticket.
///
/// Non-regular tickets are served ahead of regular tickets in the same scope
/// but keep arrival order among themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityCategory {
    /// Standard lane
    Regular,
    /// Person with disability
    Pwd,
    /// Senior citizen
    SeniorCitizen,
    /// Pregnant customer
    Pregnant,
}

impl PriorityCategory {
    /// Whether this category jumps ahead of the regular lane.
    #[must_use]
    pub const fn is_priority(self) -> bool {
        !matches!(self, Self::Regular)
    }

    /// Parse a category from its wire name (case-insensitive, trimmed).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "regular" => Some(Self::Regular),
            "pwd" => Some(Self::Pwd),
            "senior_citizen" => Some(Self::SeniorCitizen),
            "pregnant" => Some(Self::Pregnant),
            _ => None,
        }
    }

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Pwd => "pwd",
            Self::SeniorCitizen => "senior_citizen",
            Self::Pregnant => "pregnant",
        }
    }
}

impl fmt::Display for PriorityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a ticket.
///
/// ```text
/// waiting ──▶ serving ──▶ completed
///    │  ▲        │
///    │  └─(requeue/transfer)
///    ├──▶ skipped ──▶ waiting
///    └──▶ cancelled ◀── serving
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// In a waiting line, not yet called
    Waiting,
    /// Being served at a window right now
    Serving,
    /// Service finished
    Completed,
    /// Called but not present; parked in the skipped list
    Skipped,
    /// Abandoned before completion
    Cancelled,
}

impl TicketStatus {
    /// Terminal statuses release the ticket's queue number back to the pool.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::Serving => "serving",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Customer details captured at the kiosk.
///
/// Name and contact never appear in broadcast events or public queue views;
/// they are visible only to admin consoles and the submitter's own responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Customer name as typed at the kiosk
    pub name: String,
    /// Phone number or email address
    pub contact: String,
    /// Relationship to the university
    pub role: CustomerRole,
    /// Lane priority
    pub priority: PriorityCategory,
}

/// A queue entry: the central mutable entity of the system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Opaque unique id
    pub id: TicketId,
    /// Owning department (scopes the queue number)
    pub department: Department,
    /// The service the customer asked for
    pub service_id: ServiceId,
    /// Resolved window, `None` for departments without window-level split
    pub window_id: Option<WindowId>,
    /// Customer details (admin-only fields)
    pub customer: CustomerInfo,
    /// Current lifecycle state
    pub status: TicketStatus,
    /// Display number, unique per active cycle of the department
    pub number: QueueNumber,
    /// When the ticket was submitted
    pub created_at: DateTime<Utc>,
    /// When the status last changed
    pub status_changed_at: DateTime<Utc>,
}

impl Ticket {
    /// Whether the ticket still occupies its queue number.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// A service offered by a department.
///
/// Reference data: created and updated by external admin tooling, read-only
/// to the dispatch engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique id
    pub id: ServiceId,
    /// Owning department
    pub department: Department,
    /// Canonical display name (matched case-insensitively on submission)
    pub name: String,
    /// Grouping label for the kiosk menu
    pub category: String,
    /// Estimated processing time in minutes
    pub estimated_minutes: u32,
}

/// A staffed service window within a department.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Unique id
    pub id: WindowId,
    /// Owning department
    pub department: Department,
    /// Small number staff and signage refer to ("window 3")
    pub number: u8,
    /// Display label
    pub label: String,
    /// Closed windows stop receiving routed submissions
    pub open: bool,
    /// Services this window can handle
    pub service_ids: Vec<ServiceId>,
    /// Staff member currently assigned, if any
    pub operator: Option<String>,
}

impl Window {
    /// Whether this window is assigned the given service.
    #[must_use]
    pub fn serves(&self, service: ServiceId) -> bool {
        self.service_ids.contains(&service)
    }
}

/// Addresses one waiting line: a department plus an optional window number.
///
/// Departments configured without windows run a single shared line; their
/// scope has `window: None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Owning department
    pub department: Department,
    /// Window number within the department, `None` for the shared line
    pub window: Option<u8>,
}

impl Scope {
    /// Scope for a department's shared line.
    #[must_use]
    pub const fn department(department: Department) -> Self {
        Self {
            department,
            window: None,
        }
    }

    /// Scope for a specific window.
    #[must_use]
    pub const fn window(department: Department, number: u8) -> Self {
        Self {
            department,
            window: Some(number),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window {
            Some(number) => write!(f, "{} window {number}", self.department),
            None => write!(f, "{}", self.department),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn queue_number_rejects_out_of_range() {
        assert!(QueueNumber::new(0).is_err());
        assert!(QueueNumber::new(100).is_err());
        assert!(QueueNumber::new(1).is_ok());
        assert!(QueueNumber::new(99).is_ok());
    }

    #[test]
    fn queue_number_wraps_at_both_ends() {
        assert_eq!(QueueNumber::MAX.wrapping_next(), QueueNumber::MIN);
        assert_eq!(QueueNumber::MIN.wrapping_prev(), QueueNumber::MAX);
        let five = QueueNumber::new(5).unwrap();
        assert_eq!(five.wrapping_next().get(), 6);
        assert_eq!(five.wrapping_prev().get(), 4);
    }

    #[test]
    fn queue_number_deserializes_only_valid_values() {
        let ok: QueueNumber = serde_json::from_str("42").unwrap();
        assert_eq!(ok.get(), 42);
        assert!(serde_json::from_str::<QueueNumber>("0").is_err());
        assert!(serde_json::from_str::<QueueNumber>("150").is_err());
    }

    #[test]
    fn department_parses_case_insensitively() {
        assert_eq!(Department::from_name(" Registrar "), Some(Department::Registrar));
        assert_eq!(Department::from_name("CASHIER"), Some(Department::Cashier));
        assert_eq!(Department::from_name("library"), None);
    }

    #[test]
    fn department_serializes_snake_case() {
        let json = serde_json::to_string(&Department::Registrar).unwrap();
        assert_eq!(json, "\"registrar\"");
    }

    #[test]
    fn priority_category_knows_its_lane() {
        assert!(!PriorityCategory::Regular.is_priority());
        assert!(PriorityCategory::Pwd.is_priority());
        assert!(PriorityCategory::SeniorCitizen.is_priority());
        assert!(PriorityCategory::Pregnant.is_priority());
        assert_eq!(
            PriorityCategory::from_name("senior_citizen"),
            Some(PriorityCategory::SeniorCitizen)
        );
    }

    #[test]
    fn ticket_status_terminal_states() {
        assert!(TicketStatus::Completed.is_terminal());
        assert!(TicketStatus::Cancelled.is_terminal());
        assert!(!TicketStatus::Waiting.is_terminal());
        assert!(!TicketStatus::Serving.is_terminal());
        assert!(!TicketStatus::Skipped.is_terminal());
    }

    #[test]
    fn scope_displays_with_and_without_window() {
        assert_eq!(
            Scope::department(Department::Cashier).to_string(),
            "cashier"
        );
        assert_eq!(
            Scope::window(Department::Registrar, 3).to_string(),
            "registrar window 3"
        );
    }
}
