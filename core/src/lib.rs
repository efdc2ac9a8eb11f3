//! # Kiosk Core
//!
//! Core traits and types for the Kiosk Queue architecture.
//!
//! This crate provides the fundamental abstractions the queue engine is built
//! on: pure reducers over owned state, effects as values, and injected
//! dependencies via environments.
//!
//! ## Core Concepts
//!
//! - **State**: owned domain state for a feature (departments, windows,
//!   tickets, queues)
//! - **Action**: all possible inputs to a reducer — commands from handlers and
//!   the result events they produce
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: side-effect descriptions (persist, publish, resolve), never
//!   execution
//! - **Environment**: injected dependencies behind traits (clock, repository,
//!   broadcaster)
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O)
//! - Dependency injection via environment
//!
//! ## Example
//!
//! ```ignore
//! use kiosk_core::{effect::Effect, reducer::Reducer, SmallVec, smallvec};
//!
//! impl Reducer for DispatchReducer {
//!     type State = DispatchState;
//!     type Action = DispatchAction;
//!     type Environment = DispatchEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut DispatchState,
//!         action: DispatchAction,
//!         env: &DispatchEnvironment,
//!     ) -> SmallVec<[Effect<DispatchAction>; 4]> {
//!         match action {
//!             DispatchAction::SubmitTicket { .. } => {
//!                 // validate, mutate state, describe effects
//!                 smallvec![Effect::None]
//!             }
//!             _ => smallvec![Effect::None],
//!         }
//!     }
//! }
//! ```

pub mod effect;
pub mod environment;
pub mod reducer;

// Re-export commonly used types so downstream crates share one version.
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use environment::{Clock, SystemClock};
pub use reducer::Reducer;
