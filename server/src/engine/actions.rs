//! Actions accepted by the dispatch reducer.
//!
//! The enum splits into commands and results. HTTP handlers send commands
//! tagged with a fresh [`RequestId`] and wait on the store's action broadcast
//! for the result carrying the same id. Results are produced by reducer
//! effects and are no-ops when fed back through the reducer.

use crate::engine::events::ScopeSnapshot;
use crate::error::DispatchError;
use crate::types::{Department, RequestId, Scope, Ticket, TicketId, Window};
use serde::{Deserialize, Serialize};

/// Raw submission payload as captured at a kiosk terminal.
///
/// Everything is a string on purpose: kiosks send free text, and validation
/// is the reducer's job so that every rejection flows through the same
/// [`DispatchError`] path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSubmission {
    /// Department wire name
    pub department: String,
    /// Service name or alias, matched case-insensitively
    pub service: String,
    /// Customer name
    pub name: String,
    /// Phone number or email address
    pub contact: String,
    /// Customer role wire name
    pub role: String,
    /// Priority category wire name; absent means regular
    pub priority: Option<String>,
}

/// Everything the dispatch engine can be asked to do, plus the results it
/// answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DispatchAction {
    // ----- Commands -----
    /// Submit a new ticket from a kiosk
    SubmitTicket {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Id assigned by the handler before dispatch
        ticket_id: TicketId,
        /// Raw kiosk payload
        submission: TicketSubmission,
    },
    /// Cancel a ticket before completion
    CancelTicket {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which ticket to cancel
        ticket_id: TicketId,
    },
    /// Call the next waiting ticket in a scope
    CallNext {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which waiting line
        scope: Scope,
    },
    /// Set the next waiting ticket aside as skipped
    Skip {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which waiting line
        scope: Scope,
    },
    /// Re-announce the current display without changing state
    Recall {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which waiting line
        scope: Scope,
    },
    /// Step the display one number backwards
    Previous {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which waiting line
        scope: Scope,
    },
    /// Complete the ticket being served without calling another
    Stop {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which waiting line
        scope: Scope,
    },
    /// Move a ticket to another window's waiting band
    Transfer {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Scope the admin console is acting from
        scope: Scope,
        /// Which ticket to move
        ticket_id: TicketId,
        /// Destination window number
        target_window: u8,
    },
    /// Return a skipped ticket to the tail of its priority band
    RequeueSkipped {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Which waiting line
        scope: Scope,
        /// Which skipped ticket to requeue
        ticket_id: TicketId,
    },
    /// Open or close a window
    SetWindowOpen {
        /// Correlation id for the caller
        request_id: RequestId,
        /// Owning department
        department: Department,
        /// Window number
        window: u8,
        /// Desired open state
        open: bool,
    },

    // ----- Results -----
    /// A submission was accepted
    TicketAccepted {
        /// Correlation id echoed back
        request_id: RequestId,
        /// The stored ticket
        ticket: Ticket,
        /// Label of the routed window, if any
        window_label: Option<String>,
        /// Wait estimate handed to the customer
        estimated_wait_minutes: u32,
    },
    /// A ticket was cancelled
    TicketCancelled {
        /// Correlation id echoed back
        request_id: RequestId,
        /// The cancelled ticket's id
        ticket_id: TicketId,
    },
    /// A staff command reshaped a queue
    QueueChanged {
        /// Correlation id echoed back
        request_id: RequestId,
        /// Department the command ran against
        department: Department,
        /// Staff snapshot of the commanded scope after the change
        snapshot: ScopeSnapshot,
    },
    /// A window's open state changed
    WindowUpdated {
        /// Correlation id echoed back
        request_id: RequestId,
        /// The window as stored
        window: Window,
    },
    /// A command failed; nothing was changed or published
    CommandRejected {
        /// Correlation id echoed back
        request_id: RequestId,
        /// Why the command failed
        error: DispatchError,
    },
}

impl DispatchAction {
    /// The correlation id carried by every action.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        match self {
            Self::SubmitTicket { request_id, .. }
            | Self::CancelTicket { request_id, .. }
            | Self::CallNext { request_id, .. }
            | Self::Skip { request_id, .. }
            | Self::Recall { request_id, .. }
            | Self::Previous { request_id, .. }
            | Self::Stop { request_id, .. }
            | Self::Transfer { request_id, .. }
            | Self::RequeueSkipped { request_id, .. }
            | Self::SetWindowOpen { request_id, .. }
            | Self::TicketAccepted { request_id, .. }
            | Self::TicketCancelled { request_id, .. }
            | Self::QueueChanged { request_id, .. }
            | Self::WindowUpdated { request_id, .. }
            | Self::CommandRejected { request_id, .. } => *request_id,
        }
    }

    /// Whether this action is a result answering some command.
    #[must_use]
    pub const fn is_result(&self) -> bool {
        matches!(
            self,
            Self::TicketAccepted { .. }
                | Self::TicketCancelled { .. }
                | Self::QueueChanged { .. }
                | Self::WindowUpdated { .. }
                | Self::CommandRejected { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn request_id_is_reachable_on_every_variant() {
        let request_id = RequestId::new();
        let action = DispatchAction::CallNext {
            request_id,
            scope: Scope::department(Department::Cashier),
        };
        assert_eq!(action.request_id(), request_id);
        assert!(!action.is_result());
    }

    #[test]
    fn rejections_are_results() {
        let action = DispatchAction::CommandRejected {
            request_id: RequestId::new(),
            error: DispatchError::validation("name must not be empty"),
        };
        assert!(action.is_result());
    }
}
