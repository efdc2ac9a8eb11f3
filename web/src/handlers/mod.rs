//! HTTP request handlers.
//!
//! This module contains transport-level handlers shared by kiosk services:
//! liveness/readiness endpoints and the WebSocket message envelope.

pub mod health;
pub mod websocket;

// Re-export common handler utilities
pub use health::health_check;
pub use websocket::WsMessage;
