//! Kiosk queue dispatch HTTP server.
//!
//! Restores queue state from disk, installs the metrics recorder, and
//! serves the kiosk/admin/display API until Ctrl+C or SIGTERM.

use kiosk_runtime::metrics::MetricsServer;
use kiosk_runtime::{Store, StoreConfig};
use kiosk_server::catalog::Catalog;
use kiosk_server::config::Config;
use kiosk_server::engine::{DispatchReducer, DispatchState, ProductionDispatchEnvironment};
use kiosk_server::repository::{JsonFileRepository, QueueRepository};
use kiosk_server::server::{AppState, build_router};
use kiosk_web::TopicBroadcaster;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kiosk_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting kiosk queue server");

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!(
        data_path = %config.storage.data_path.display(),
        average_service_minutes = config.queue.average_service_minutes,
        "Configuration loaded"
    );

    // Install the Prometheus recorder before anything records a metric
    let metrics_addr = format!(
        "{}:{}",
        config.server.metrics_host, config.server.metrics_port
    )
    .parse()?;
    let mut metrics = MetricsServer::new(metrics_addr);
    metrics.start()?;
    let metrics = Arc::new(metrics);

    // Catalog: configured file, or the built-in department set
    let catalog = match &config.storage.catalog_path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog");
            Catalog::load(path).await?
        }
        None => Catalog::built_in(),
    };
    info!(departments = catalog.departments.len(), "Catalog ready");

    // Restore the persisted queue document, if any
    let repository: Arc<dyn QueueRepository> =
        Arc::new(JsonFileRepository::new(config.storage.data_path.clone()));
    let initial_state = match repository.load().await {
        Ok(Some(document)) => {
            info!("Restoring queue state from disk");
            document.into_state(&catalog)
        }
        Ok(None) => {
            info!("No stored state; starting with empty queues");
            DispatchState::from_catalog(&catalog)
        }
        Err(err) => {
            // A corrupt document needs an operator decision; never
            // silently discard a day's queues.
            error!(error = %err, "Failed to load stored queue state");
            return Err(err.into());
        }
    };

    // Wire the dispatch store
    let broadcaster = TopicBroadcaster::with_capacity(config.queue.broadcast_capacity);
    let environment = ProductionDispatchEnvironment::new(
        Arc::clone(&repository),
        broadcaster.clone(),
        config.queue.average_service_minutes,
    );
    let store = Arc::new(Store::with_config(
        initial_state,
        DispatchReducer,
        environment,
        StoreConfig::default().with_broadcast_capacity(config.queue.broadcast_capacity),
    ));

    // Build router
    let state = AppState::new(
        Arc::clone(&store),
        broadcaster,
        Arc::clone(&config),
        metrics,
    );
    let app = build_router(state);

    // Serve until a shutdown signal arrives
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let in-flight flushes and broadcasts finish
    if let Err(err) = store.shutdown(config.shutdown_timeout()).await {
        warn!(error = %err, "Store shutdown incomplete");
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve when Ctrl+C or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
