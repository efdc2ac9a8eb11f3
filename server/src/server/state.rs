//! Application state for the kiosk HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - The dispatch store (single-writer queue engine)
//! - The topic broadcaster (per-department event fan-out)
//! - Configuration and the metrics recorder handle

use crate::config::Config;
use crate::engine::{
    DispatchAction, DispatchReducer, DispatchState, ProductionDispatchEnvironment, QueueEvent,
};
use kiosk_runtime::metrics::MetricsServer;
use kiosk_runtime::Store;
use kiosk_web::TopicBroadcaster;
use std::sync::Arc;

/// The one store every handler sends dispatch commands through.
pub type DispatchStore =
    Store<DispatchState, DispatchAction, ProductionDispatchEnvironment, DispatchReducer>;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
///
/// # Architecture
///
/// Handlers never touch queue state directly. Commands go through
/// [`DispatchStore::send_and_wait_for`]; reads go through the store's
/// `state` accessor; live updates come off the [`TopicBroadcaster`].
#[derive(Clone)]
pub struct AppState {
    /// Dispatch store all commands and reads go through
    pub store: Arc<DispatchStore>,

    /// Per-department queue event fan-out (shared with the store environment)
    pub broadcaster: TopicBroadcaster<QueueEvent>,

    /// Loaded configuration
    pub config: Arc<Config>,

    /// Prometheus recorder, rendered by the `/metrics` route
    pub metrics: Arc<MetricsServer>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<DispatchStore>,
        broadcaster: TopicBroadcaster<QueueEvent>,
        config: Arc<Config>,
        metrics: Arc<MetricsServer>,
    ) -> Self {
        Self {
            store,
            broadcaster,
            config,
            metrics,
        }
    }
}
