//! Axum web layer for the kiosk queue backend.
//!
//! This crate provides the glue between the Axum web framework and the
//! dispatch engine, implementing the "Functional Core, Imperative Shell"
//! pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, WebSockets
//! │  - Request parsing                      │  ← Correlation IDs, CORS
//! │  - Response serialization               │  ← Logging, metrics
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Pure queue logic (reducers)          │  ← Testable at memory speed
//! │  - State transformations                │  ← No I/O, no side effects
//! │  - Effect descriptions (values)         │  ← Composable, inspectable
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body, path, query)
//! 3. **Build a command action** from the extracted data
//! 4. **Dispatch** the action through the `Store` and await the result event
//! 5. **Effects run** (repository flush, event broadcast)
//! 6. **Map the result event** to an HTTP response
//!
//! # Example
//!
//! ```ignore
//! use kiosk_web::{AppError, WebResult};
//! use axum::{Json, Router, extract::State, routing::post};
//!
//! async fn submit_ticket(
//!     State(state): State<AppState>,
//!     Json(request): Json<SubmitTicketRequest>,
//! ) -> WebResult<Json<TicketResponse>> {
//!     // 1. Build action from request
//!     let request_id = RequestId::new();
//!     let action = DispatchAction::SubmitTicket { request_id, submission };
//!
//!     // 2. Dispatch through store and wait for the matching result event
//!     let result = state
//!         .store
//!         .send_and_wait_for(action, timeout, move |a| matches(a, request_id))
//!         .await?;
//!
//!     // 3. Return response
//!     Ok(Json(result.into()))
//! }
//!
//! let app = Router::new()
//!     .route("/api/v1/tickets", post(submit_ticket))
//!     .with_state(app_state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod broadcast;
pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use broadcast::TopicBroadcaster;
pub use error::AppError;
pub use handlers::websocket::WsMessage;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationIdExt, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
