//! Domain errors for the dispatch engine.

use crate::types::Department;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a dispatch command was rejected.
///
/// All variants are local validation failures returned synchronously; none
/// trigger retries, and none leave partial state behind. The variants ride
/// inside result actions, so they are cloneable and serializable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchError {
    /// Customer fields were missing or malformed. Rejected before any state
    /// mutation. HTTP 400.
    #[error("validation failed: {message}")]
    Validation {
        /// What was wrong with the submission
        message: String,
    },

    /// The service exists but no open window serves it. HTTP 409.
    #[error("no open window serves \"{service}\" in {department}")]
    NoWindowAvailable {
        /// Department that was asked
        department: Department,
        /// Canonical name of the resolved service
        service: String,
    },

    /// Every number in the 1-99 cycle is held by an active ticket. HTTP 503.
    #[error("queue numbers exhausted for {department}")]
    ExhaustedRange {
        /// Department whose cycle is full
        department: Department,
    },

    /// The transfer target window cannot serve the ticket's service. The
    /// ticket stays where it was. HTTP 409.
    #[error("window {window} is not assigned the ticket's service")]
    InvalidTransfer {
        /// Target window number
        window: u8,
    },

    /// A referenced ticket, department, window, or service does not exist.
    /// HTTP 404.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of entity that was referenced
        resource: String,
        /// The identifier that failed to resolve
        id: String,
    },
}

impl DispatchError {
    /// Convenience constructor for validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Convenience constructor for missing entities.
    pub fn not_found(resource: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Short machine name used for metrics labels.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NoWindowAvailable { .. } => "no_window_available",
            Self::ExhaustedRange { .. } => "exhausted_range",
            Self::InvalidTransfer { .. } => "invalid_transfer",
            Self::NotFound { .. } => "not_found",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_operator_readable() {
        let err = DispatchError::NoWindowAvailable {
            department: Department::Registrar,
            service: "Transcript Request".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no open window serves \"Transcript Request\" in registrar"
        );

        let err = DispatchError::not_found("Ticket", "abc123");
        assert_eq!(err.to_string(), "Ticket abc123 not found");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let err = DispatchError::ExhaustedRange {
            department: Department::Cashier,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "exhausted_range");
        assert_eq!(json["department"], "cashier");
    }

    #[test]
    fn reason_labels_are_stable() {
        assert_eq!(DispatchError::validation("x").reason(), "validation");
        assert_eq!(
            DispatchError::InvalidTransfer { window: 2 }.reason(),
            "invalid_transfer"
        );
    }
}
