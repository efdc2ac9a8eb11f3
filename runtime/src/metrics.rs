//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for all engine components:
//! - Ticket lifecycle (issued, completed, skipped, cancelled, transferred)
//! - Queue depth per department
//! - Event broadcasting and WebSocket connections
//! - Repository flushes
//! - Reducer execution and effect handling
//!
//! # Example
//!
//! ```rust,no_run
//! use kiosk_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Start metrics exporter, scrape endpoint served by the app
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
    /// Failed to bind HTTP server
    #[error("Failed to bind metrics server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Prometheus metrics recorder.
///
/// Installs the global recorder and exposes a handle for rendering the
/// scrape payload (served by the app's `/metrics` route).
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address the scrape endpoint is served on (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Initialize metrics and install the recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the metrics exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a metrics recorder is already installed (e.g., in tests), this will
    /// warn and continue. In production, ensure this is only called once.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        // Register all metric descriptions
        register_metrics();

        // Build and install the Prometheus exporter
        let builder = PrometheusBuilder::new()
            // Configure histogram buckets for latency measurements
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        // Try to install the recorder
        // In tests, this may fail if a recorder is already installed
        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!(
                    addr = %self.addr,
                    "Metrics recorder installed - scrape at http://{}/metrics",
                    self.addr
                );
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    // In tests, multiple MetricsServer instances may be created
                    // We'll allow this but warn about it
                    tracing::warn!(
                        "Metrics recorder already initialized, skipping re-initialization"
                    );
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder hasn't been installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Ticket lifecycle metrics
    describe_counter!(
        "tickets.issued.total",
        "Total number of queue tickets issued"
    );
    describe_counter!(
        "tickets.completed.total",
        "Total number of tickets completed at a window"
    );
    describe_counter!(
        "tickets.skipped.total",
        "Total number of tickets skipped by staff"
    );
    describe_counter!(
        "tickets.cancelled.total",
        "Total number of tickets cancelled before service"
    );
    describe_counter!(
        "tickets.transferred.total",
        "Total number of tickets transferred between windows"
    );
    describe_counter!(
        "tickets.requeued.total",
        "Total number of skipped tickets returned to the waiting line"
    );
    describe_counter!(
        "tickets.rejected.total",
        "Total number of ticket submissions rejected"
    );

    // Queue metrics
    describe_gauge!(
        "queue.waiting.depth",
        "Number of tickets currently waiting, per department"
    );

    // Broadcast metrics
    describe_counter!(
        "events.broadcast.total",
        "Total number of queue events broadcast to subscribers"
    );
    describe_gauge!(
        "ws.connections.active",
        "Number of active WebSocket subscriptions"
    );

    // Repository metrics
    describe_counter!(
        "repository.flush.errors.total",
        "Total number of failed snapshot flushes"
    );
    describe_histogram!(
        "repository.flush.duration_seconds",
        "Time taken to flush a department snapshot"
    );
    describe_histogram!(
        "repository.load.duration_seconds",
        "Time taken to load department snapshots at startup"
    );

    // Store metrics (recorded inline by the runtime)
    describe_counter!(
        "store.commands.total",
        "Total number of actions processed by the store"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects executed, labelled by type"
    );
    describe_counter!(
        "store.shutdown.initiated",
        "Number of times store shutdown was initiated"
    );
    describe_counter!(
        "store.shutdown.completed",
        "Number of times store shutdown drained all effects"
    );
    describe_counter!(
        "store.shutdown.timeout",
        "Number of times store shutdown timed out"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Number of actions rejected during shutdown"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to execute the reducer"
    );
    describe_histogram!(
        "store.effects.count",
        "Number of effects produced per action"
    );
}

/// Ticket lifecycle metrics recorder.
pub struct TicketMetrics;

impl TicketMetrics {
    /// Record a ticket issued for a department.
    pub fn record_issued(department: &str, priority: bool) {
        counter!(
            "tickets.issued.total",
            "department" => department.to_string(),
            "priority" => priority.to_string()
        )
        .increment(1);
    }

    /// Record a ticket completed at a window.
    pub fn record_completed(department: &str) {
        counter!("tickets.completed.total", "department" => department.to_string()).increment(1);
    }

    /// Record a ticket skipped by staff.
    pub fn record_skipped(department: &str) {
        counter!("tickets.skipped.total", "department" => department.to_string()).increment(1);
    }

    /// Record a ticket cancelled before service.
    pub fn record_cancelled(department: &str) {
        counter!("tickets.cancelled.total", "department" => department.to_string()).increment(1);
    }

    /// Record a ticket transferred between windows.
    pub fn record_transferred(department: &str) {
        counter!("tickets.transferred.total", "department" => department.to_string()).increment(1);
    }

    /// Record a skipped ticket returned to the waiting line.
    pub fn record_requeued(department: &str) {
        counter!("tickets.requeued.total", "department" => department.to_string()).increment(1);
    }

    /// Record a rejected ticket submission.
    pub fn record_rejected(department: &str, reason: &str) {
        counter!(
            "tickets.rejected.total",
            "department" => department.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1);
    }
}

/// Queue depth metrics recorder.
pub struct QueueMetrics;

impl QueueMetrics {
    /// Record current waiting depth for a department.
    pub fn record_depth(department: &str, waiting: usize) {
        // Note: Precision loss acceptable for gauges (queue depths < 2^52)
        #[allow(clippy::cast_precision_loss)]
        gauge!("queue.waiting.depth", "department" => department.to_string())
            .set(waiting as f64);
    }
}

/// Broadcast metrics recorder.
pub struct BroadcastMetrics;

impl BroadcastMetrics {
    /// Record a queue event broadcast to subscribers.
    pub fn record_event(department: &str) {
        counter!("events.broadcast.total", "department" => department.to_string()).increment(1);
    }

    /// Record a WebSocket subscription opened.
    pub fn record_connection_opened() {
        gauge!("ws.connections.active").increment(1.0);
    }

    /// Record a WebSocket subscription closed.
    pub fn record_connection_closed() {
        gauge!("ws.connections.active").decrement(1.0);
    }
}

/// Repository metrics recorder.
pub struct RepositoryMetrics;

impl RepositoryMetrics {
    /// Record a snapshot flush.
    pub fn record_flush(duration: Duration) {
        histogram!("repository.flush.duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a failed snapshot flush.
    pub fn record_flush_error() {
        counter!("repository.flush.errors.total").increment(1);
    }

    /// Record a startup snapshot load.
    pub fn record_load(duration: Duration) {
        histogram!("repository.load.duration_seconds").record(duration.as_secs_f64());
    }
}
