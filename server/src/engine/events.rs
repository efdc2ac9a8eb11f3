//! Snapshot and broadcast-event types.
//!
//! Two snapshot shapes exist on purpose: [`QueueSnapshot`] carries only
//! public-safe fields and is what display boards and the public queue view
//! receive; [`ScopeSnapshot`] carries full ticket records and is returned to
//! staff endpoints. Customer name and contact never appear in a
//! [`QueueSnapshot`].

use crate::types::{Department, PriorityCategory, QueueNumber, Ticket};
use serde::{Deserialize, Serialize};

/// Public-safe projection of a ticket. Safe to show on a lobby display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTicket {
    /// Queue number
    pub number: QueueNumber,
    /// Service name
    pub service: String,
    /// Priority category
    pub priority: PriorityCategory,
    /// Label of the assigned window, if any
    pub window: Option<String>,
}

/// Public-safe view of one dispatch scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Department the scope belongs to
    pub department: Department,
    /// Window number, absent for a shared departmental line or a
    /// department-wide overview
    pub window: Option<u8>,
    /// Window label, when scoped to one window
    pub window_label: Option<String>,
    /// Waiting tickets in call order
    pub waiting: Vec<PublicTicket>,
    /// Ticket currently being served
    pub serving: Option<PublicTicket>,
    /// Number shown on the scope's display
    pub displayed: Option<QueueNumber>,
}

/// Staff view of one dispatch scope, with full ticket records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    /// Department the scope belongs to
    pub department: Department,
    /// Window number, absent for a shared departmental line
    pub window: Option<u8>,
    /// Window label, when scoped to one window
    pub window_label: Option<String>,
    /// Waiting tickets in call order
    pub waiting: Vec<Ticket>,
    /// Skipped tickets awaiting requeue, oldest first
    pub skipped: Vec<Ticket>,
    /// Ticket currently being served
    pub serving: Option<Ticket>,
    /// Number shown on the scope's display
    pub displayed: Option<QueueNumber>,
}

/// Events broadcast to department subscribers after a committed change.
///
/// Delivery is at-most-once: a subscriber that falls behind or reconnects
/// re-fetches the queue view instead of replaying missed events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    /// A ticket entered the queue
    TicketCreated {
        /// Department the ticket belongs to
        department: Department,
        /// Window the ticket was routed to, if any
        window: Option<u8>,
        /// Public-safe ticket projection
        ticket: PublicTicket,
    },
    /// A scope's queue changed shape
    QueueUpdate {
        /// Department the scope belongs to
        department: Department,
        /// Window number, absent for a shared line
        window: Option<u8>,
        /// Fresh public-safe snapshot of the scope
        snapshot: QueueSnapshot,
    },
}

impl QueueEvent {
    /// Department this event concerns; doubles as the broadcast topic.
    #[must_use]
    pub const fn department(&self) -> Department {
        match self {
            Self::TicketCreated { department, .. } | Self::QueueUpdate { department, .. } => {
                *department
            }
        }
    }

    /// Window the event concerns, if scoped to one.
    #[must_use]
    pub const fn window(&self) -> Option<u8> {
        match self {
            Self::TicketCreated { window, .. } | Self::QueueUpdate { window, .. } => *window,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn events_tag_with_snake_case_type_names() {
        let event = QueueEvent::TicketCreated {
            department: Department::Registrar,
            window: Some(1),
            ticket: PublicTicket {
                number: QueueNumber::MIN,
                service: "Transcript Request".to_string(),
                priority: PriorityCategory::Regular,
                window: Some("Window 1".to_string()),
            },
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"ticket_created""#));
    }

    #[test]
    fn queue_update_carries_the_snapshot() {
        let event = QueueEvent::QueueUpdate {
            department: Department::Cashier,
            window: None,
            snapshot: QueueSnapshot {
                department: Department::Cashier,
                window: None,
                window_label: None,
                waiting: Vec::new(),
                serving: None,
                displayed: None,
            },
        };

        assert_eq!(event.department(), Department::Cashier);
        assert_eq!(event.window(), None);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"queue_update""#));
    }

    #[test]
    fn public_ticket_has_no_customer_fields() {
        let ticket = PublicTicket {
            number: QueueNumber::MAX,
            service: "Tuition Payment".to_string(),
            priority: PriorityCategory::Pwd,
            window: None,
        };

        let json = serde_json::to_string(&ticket).unwrap();
        assert!(!json.contains("name"));
        assert!(!json.contains("contact"));
    }
}
