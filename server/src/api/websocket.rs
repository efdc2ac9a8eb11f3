//! WebSocket endpoint for real-time queue updates.
//!
//! Kiosk displays and admin consoles open one connection per department:
//!
//! ```text
//! ws://localhost:8080/api/v1/departments/:department/events
//! ```
//!
//! The stream is one-way: the server pushes [`QueueEvent`]s wrapped in the
//! [`WsMessage`] envelope; clients filter by the window tag inside each
//! event. Delivery is at-most-once - on (re)connect a client must fetch
//! the full queue view over REST before trusting the stream.
//!
//! # Connection Limits
//!
//! - Max concurrent connections per server instance (configurable)
//! - Idle timeout: 5 minutes, reset by pong
//! - Ping keep-alive every 30 seconds

#![allow(clippy::cognitive_complexity)] // WebSocket event loops are naturally complex

use crate::engine::QueueEvent;
use crate::server::state::AppState;
use crate::types::Department;
use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, stream::StreamExt};
use kiosk_runtime::metrics::BroadcastMetrics;
use kiosk_web::{AppError, WsMessage};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, interval};
use tracing::{debug, info, warn};

/// Global WebSocket connection counter.
///
/// Tracks active connections to enforce the instance-wide limit.
static ACTIVE_CONNECTIONS: AtomicUsize = AtomicUsize::new(0);

/// Ping interval for keep-alive (30 seconds).
const PING_INTERVAL_SECS: u64 = 30;

/// Idle timeout (5 minutes).
const IDLE_TIMEOUT_SECS: u64 = 300;

/// WebSocket endpoint for a department's queue events.
///
/// **Public endpoint** - no authentication. The department is fixed by the
/// URL path, so there is no subscribe handshake.
///
/// Returns 503 Service Unavailable when the connection limit is reached
/// and 404 for unknown departments.
///
/// # Example
///
/// ```javascript
/// const ws = new WebSocket('ws://localhost:8080/api/v1/departments/registrar/events');
///
/// ws.onmessage = (frame) => {
///   const msg = JSON.parse(frame.data);
///   if (msg.type === 'event' && msg.event.window === myWindow) {
///     render(msg.event);
///   }
/// };
/// ```
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn queue_events(
    ws: WebSocketUpgrade,
    Path(department): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let Some(department) = Department::from_name(&department) else {
        return AppError::not_found("Department", department).into_response();
    };

    let current = ACTIVE_CONNECTIONS.load(Ordering::Relaxed);
    if current >= state.config.queue.max_ws_connections {
        warn!(
            current_connections = current,
            "WebSocket connection limit exceeded"
        );
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Too many concurrent connections. Please try again later.",
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| handle_queue_socket(socket, department, state))
}

/// Handle one department event stream connection.
///
/// Runs three tasks - broadcast forwarding, keep-alive pings, and the
/// client read loop with idle timeout - and tears all of them down when
/// any one finishes.
async fn handle_queue_socket(socket: WebSocket, department: Department, state: AppState) {
    let count = ACTIVE_CONNECTIONS.fetch_add(1, Ordering::Relaxed) + 1;
    BroadcastMetrics::record_connection_opened();
    info!(
        department = %department,
        total_connections = count,
        "WebSocket connection established"
    );

    // Subscribe before splitting so no event published after the upgrade
    // is missed.
    let mut events = state.broadcaster.subscribe(department.as_str()).await;

    let (sender, mut receiver) = socket.split();
    let sender = Arc::new(tokio::sync::Mutex::new(sender));

    // Forward broadcast events to the client.
    let event_sender = Arc::clone(&sender);
    let mut event_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok((_, event)) => {
                    let frame = WsMessage::Event { event };
                    if let Ok(json) = serde_json::to_string(&frame) {
                        let mut guard = event_sender.lock().await;
                        if guard.send(Message::Text(json)).await.is_err() {
                            debug!("Client disconnected during event stream");
                            return;
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // At-most-once delivery: tell the client to re-fetch
                    // instead of replaying what was dropped.
                    warn!(skipped, "WebSocket subscriber lagged");
                    let frame = WsMessage::<QueueEvent>::Error {
                        message: "events dropped; refresh the queue view".to_string(),
                    };
                    if let Ok(json) = serde_json::to_string(&frame) {
                        let mut guard = event_sender.lock().await;
                        if guard.send(Message::Text(json)).await.is_err() {
                            return;
                        }
                    }
                }
                Err(RecvError::Closed) => {
                    debug!("Broadcast channel closed");
                    return;
                }
            }
        }
    });

    // Keep-alive pings.
    let ping_sender = Arc::clone(&sender);
    let mut ping_interval = interval(Duration::from_secs(PING_INTERVAL_SECS));
    let mut ping_task = tokio::spawn(async move {
        loop {
            ping_interval.tick().await;
            let Ok(json) = serde_json::to_string(&WsMessage::<QueueEvent>::Ping) else {
                break;
            };
            let mut guard = ping_sender.lock().await;
            if guard.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
        debug!("WebSocket ping task terminated");
    });

    // Client read loop: pongs reset the idle timeout, pings get answered.
    let pong_sender = Arc::clone(&sender);
    let mut recv_task = tokio::spawn(async move {
        let timeout = tokio::time::sleep(Duration::from_secs(IDLE_TIMEOUT_SECS));
        tokio::pin!(timeout);

        loop {
            tokio::select! {
                Some(Ok(msg)) = receiver.next() => {
                    match msg {
                        Message::Pong(_) => {
                            timeout.as_mut().reset(
                                tokio::time::Instant::now() + Duration::from_secs(IDLE_TIMEOUT_SECS),
                            );
                        }
                        Message::Text(text) => {
                            match serde_json::from_str::<WsMessage<QueueEvent>>(&text) {
                                Ok(WsMessage::Pong) => {
                                    timeout.as_mut().reset(
                                        tokio::time::Instant::now() + Duration::from_secs(IDLE_TIMEOUT_SECS),
                                    );
                                }
                                Ok(WsMessage::Ping) => {
                                    let Ok(json) = serde_json::to_string(&WsMessage::<QueueEvent>::Pong) else {
                                        continue;
                                    };
                                    let mut guard = pong_sender.lock().await;
                                    if guard.send(Message::Text(json)).await.is_err() {
                                        break;
                                    }
                                }
                                _ => debug!("Ignoring unexpected client message"),
                            }
                        }
                        Message::Close(_) => {
                            info!("Client requested close");
                            break;
                        }
                        _ => debug!("Received unexpected message type"),
                    }
                }
                () = &mut timeout => {
                    warn!("WebSocket idle timeout");
                    break;
                }
            }
        }

        debug!("WebSocket receive task terminated");
    });

    // First task to finish tears the connection down.
    tokio::select! {
        _ = (&mut event_task) => {
            ping_task.abort();
            recv_task.abort();
        },
        _ = (&mut ping_task) => {
            event_task.abort();
            recv_task.abort();
        },
        _ = (&mut recv_task) => {
            event_task.abort();
            ping_task.abort();
        },
    }

    let count = ACTIVE_CONNECTIONS.fetch_sub(1, Ordering::Relaxed) - 1;
    BroadcastMetrics::record_connection_closed();
    info!(
        department = %department,
        total_connections = count,
        "WebSocket connection closed"
    );
}
