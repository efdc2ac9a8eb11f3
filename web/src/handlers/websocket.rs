//! WebSocket message envelope for real-time queue updates.
//!
//! Kiosk displays and admin consoles open one WebSocket per department; the
//! department is fixed by the URL path, so there is no subscribe handshake.
//! The stream is one-way: the server pushes queue events, the client filters
//! by the window tag carried inside each event.
//!
//! # Message Protocol
//!
//! **Server → Client (Event):**
//! ```json
//! {
//!   "type": "event",
//!   "event": { "type": "queue_update", "department": "registrar", ... }
//! }
//! ```
//!
//! **Server → Client (Error):**
//! ```json
//! {
//!   "type": "error",
//!   "message": "Events dropped; refresh the queue view"
//! }
//! ```
//!
//! **Keep-alive:** `{"type":"ping"}` / `{"type":"pong"}` envelopes in either
//! direction, in addition to protocol-level ping/pong frames.
//!
//! # Reconciliation
//!
//! Delivery is at-most-once. On (re)connect a client must fetch the full
//! queue view over REST; the event stream only signals that a fetch-free
//! local update is possible.
//!
//! # Example
//!
//! ```javascript
//! // A window display connects and filters by its own window number
//! const ws = new WebSocket('ws://localhost:8080/api/v1/departments/registrar/events');
//!
//! ws.onmessage = (frame) => {
//!   const msg = JSON.parse(frame.data);
//!   if (msg.type === 'event' && msg.event.window === myWindow) {
//!     render(msg.event);
//!   }
//! };
//! ```

use serde::{Deserialize, Serialize};

/// WebSocket message envelope for server-client communication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WsMessage<A> {
    /// Event from server (queue state change)
    Event {
        /// The broadcasted queue event
        event: A,
    },
    /// Error message
    Error {
        /// Error description
        message: String,
    },
    /// Ping message (keep-alive)
    Ping,
    /// Pong response
    Pong,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::similar_names)] // ping and pong are standard WebSocket terms
    fn test_ws_message_serialization() {
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
        #[serde(rename_all = "snake_case")]
        enum TestEvent {
            TicketCreated,
            QueueUpdate,
        }

        // Test Event serialization
        let event = WsMessage::Event {
            event: TestEvent::TicketCreated,
        };
        let json = serde_json::to_string(&event).expect("Serialize");
        assert_eq!(json, r#"{"type":"event","event":"ticket_created"}"#);

        // Test Event deserialization
        let parsed: WsMessage<TestEvent> = serde_json::from_str(&json).expect("Deserialize");
        assert!(matches!(
            parsed,
            WsMessage::Event {
                event: TestEvent::TicketCreated
            }
        ));

        let update = WsMessage::Event {
            event: TestEvent::QueueUpdate,
        };
        let json = serde_json::to_string(&update).expect("Serialize");
        assert_eq!(json, r#"{"type":"event","event":"queue_update"}"#);

        // Test Error serialization
        let error = WsMessage::<TestEvent>::Error {
            message: "Test error".to_string(),
        };
        let json = serde_json::to_string(&error).expect("Serialize");
        assert_eq!(json, r#"{"type":"error","message":"Test error"}"#);

        // Test Ping/Pong
        let ping = WsMessage::<TestEvent>::Ping;
        let json = serde_json::to_string(&ping).expect("Serialize");
        assert_eq!(json, r#"{"type":"ping"}"#);

        let pong = WsMessage::<TestEvent>::Pong;
        let json = serde_json::to_string(&pong).expect("Serialize");
        assert_eq!(json, r#"{"type":"pong"}"#);
    }
}
