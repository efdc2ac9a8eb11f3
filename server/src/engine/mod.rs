//! The dispatch engine: queue semantics for every department.
//!
//! # Architecture
//!
//! ```text
//! HTTP handler → Store::send(DispatchAction command)
//!                 ↓
//!                 DispatchReducer validates and mutates DispatchState
//!                 ↓
//!                 One Effect::Future per command:
//!                   flush StateDocument → repository
//!                   publish QueueEvents → department topic
//!                   resolve → result action with the caller's request_id
//!                 ↓
//! Handler picks the result off the action broadcast and answers the client
//! ```
//!
//! State transitions live on [`DepartmentState`]; the reducer only
//! validates, delegates, and shapes effects. Rejected commands produce a
//! [`DispatchAction::CommandRejected`] and nothing else -- no flush, no
//! broadcast.

pub mod actions;
pub mod allocator;
pub mod environment;
pub mod events;
pub mod queue;
pub mod reducer;
pub mod router;
pub mod state;

pub use actions::{DispatchAction, TicketSubmission};
pub use environment::{DispatchEnvironment, ProductionDispatchEnvironment};
pub use events::{PublicTicket, QueueEvent, QueueSnapshot, ScopeSnapshot};
pub use queue::ScopeQueue;
pub use reducer::DispatchReducer;
pub use state::{DepartmentState, DispatchState};
