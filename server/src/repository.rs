//! Persistence for dispatch state.
//!
//! The whole state is flushed as one JSON document after every accepted
//! command. Only durable facts are stored: window definitions, ticket
//! records, and each department's numbering cursor. Queues are derived and
//! rebuilt on load.
//!
//! [`JsonFileRepository`] is the production store; writes go to a sibling
//! `.tmp` file and are renamed into place so a crash mid-flush never leaves a
//! torn document. [`InMemoryRepository`] backs tests.

use crate::catalog::Catalog;
use crate::engine::state::DispatchState;
use crate::migration::{migrate_windows, WindowDocument};
use crate::types::{
    CustomerInfo, Department, QueueNumber, ServiceId, Ticket, TicketId, TicketStatus, WindowId,
};
use kiosk_core::{DateTime, Utc};
use kiosk_runtime::metrics::RepositoryMetrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Failures while loading or saving the stored document.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying file I/O failed
    #[error("repository i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Document could not be serialized or parsed
    #[error("repository serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Boxed future returned by repository operations.
pub type RepositoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Where dispatch state is persisted.
///
/// Object-safe so the environment can hold `Arc<dyn QueueRepository>` and
/// tests can swap in [`InMemoryRepository`].
pub trait QueueRepository: Send + Sync {
    /// Load the stored document, `None` when nothing has been saved yet.
    fn load(&self) -> RepositoryFuture<'_, Option<StateDocument>>;

    /// Replace the stored document.
    fn save(&self, document: StateDocument) -> RepositoryFuture<'_, ()>;
}

// ===== Document Format =====

/// The stored form of the whole dispatch state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    /// One entry per department
    pub departments: Vec<DepartmentDocument>,
}

/// One department's stored slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDocument {
    /// Which department
    pub department: Department,
    /// Numbering cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_issued: Option<QueueNumber>,
    /// Window definitions, including open state and operator
    #[serde(default)]
    pub windows: Vec<WindowDocument>,
    /// Ticket records
    #[serde(default)]
    pub tickets: Vec<TicketDocument>,
}

/// Stored form of a ticket record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDocument {
    /// Unique id
    pub id: TicketId,
    /// The requested service
    pub service_id: ServiceId,
    /// Routed window, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    /// Customer details
    pub customer: CustomerInfo,
    /// Lifecycle state
    pub status: TicketStatus,
    /// Display number
    pub number: QueueNumber,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub status_changed_at: DateTime<Utc>,
}

impl TicketDocument {
    fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            service_id: ticket.service_id,
            window_id: ticket.window_id,
            customer: ticket.customer.clone(),
            status: ticket.status,
            number: ticket.number,
            created_at: ticket.created_at,
            status_changed_at: ticket.status_changed_at,
        }
    }

    fn into_ticket(self, department: Department) -> Ticket {
        Ticket {
            id: self.id,
            department,
            service_id: self.service_id,
            window_id: self.window_id,
            customer: self.customer,
            status: self.status,
            number: self.number,
            created_at: self.created_at,
            status_changed_at: self.status_changed_at,
        }
    }
}

impl StateDocument {
    /// Snapshot the live state into its stored form.
    #[must_use]
    pub fn from_state(state: &DispatchState) -> Self {
        Self {
            departments: state
                .departments()
                .map(|dept| DepartmentDocument {
                    department: dept.department(),
                    last_issued: dept.last_issued(),
                    windows: dept.windows().map(WindowDocument::from_window).collect(),
                    tickets: dept.tickets().map(TicketDocument::from_ticket).collect(),
                })
                .collect(),
        }
    }

    /// Rehydrate live state. Services and aliases always come from the
    /// catalog; stored windows override catalog windows because open state
    /// and operator assignments live in the document.
    #[must_use]
    pub fn into_state(self, catalog: &Catalog) -> DispatchState {
        let mut state = DispatchState::from_catalog(catalog);
        for entry in self.departments {
            let department = entry.department;
            let windows = entry
                .windows
                .into_iter()
                .map(|w| w.into_window(department))
                .collect();
            let tickets = entry
                .tickets
                .into_iter()
                .map(|t| t.into_ticket(department))
                .collect();
            state
                .department_mut(department)
                .restore_records(windows, tickets, entry.last_issued);
        }
        state
    }

    /// Apply the legacy window migration to every department. Returns the
    /// number of windows that carried the old singular field.
    pub fn migrate(&mut self) -> usize {
        self.departments
            .iter_mut()
            .map(|d| migrate_windows(&mut d.windows))
            .sum()
    }
}

// ===== Implementations =====

/// Keeps the document in memory. For tests and ephemeral deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    document: Arc<RwLock<Option<StateDocument>>>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at the stored document without going through the trait.
    pub async fn snapshot(&self) -> Option<StateDocument> {
        self.document.read().await.clone()
    }
}

impl QueueRepository for InMemoryRepository {
    fn load(&self) -> RepositoryFuture<'_, Option<StateDocument>> {
        let document = Arc::clone(&self.document);
        Box::pin(async move { Ok(document.read().await.clone()) })
    }

    fn save(&self, document: StateDocument) -> RepositoryFuture<'_, ()> {
        let slot = Arc::clone(&self.document);
        Box::pin(async move {
            *slot.write().await = Some(document);
            Ok(())
        })
    }
}

/// Stores the document as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository backed by the given file path. The file is
    /// created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl QueueRepository for JsonFileRepository {
    fn load(&self) -> RepositoryFuture<'_, Option<StateDocument>> {
        let path = self.path.clone();
        Box::pin(async move {
            let start = Instant::now();
            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
                Err(error) => return Err(error.into()),
            };
            let mut document: StateDocument = serde_json::from_str(&raw)?;
            let migrated = document.migrate();
            if migrated > 0 {
                tracing::info!(
                    path = %path.display(),
                    windows = migrated,
                    "migrated legacy window assignments in stored document"
                );
            }
            RepositoryMetrics::record_load(start.elapsed());
            Ok(Some(document))
        })
    }

    fn save(&self, document: StateDocument) -> RepositoryFuture<'_, ()> {
        let path = self.path.clone();
        Box::pin(async move {
            let start = Instant::now();
            let json = serde_json::to_string_pretty(&document)?;
            // Write-then-rename keeps the document whole under a crash.
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, json.as_bytes()).await?;
            tokio::fs::rename(&tmp, &path).await?;
            RepositoryMetrics::record_flush(start.elapsed());
            Ok(())
        })
    }
}
