//! University kiosk queue backend.
//!
//! Students and visitors submit tickets at kiosk terminals; staff drive
//! per-window consoles; display boards mirror every queue in real time.
//! This crate is the single backend process behind all three.
//!
//! # Architecture
//!
//! ```text
//!  Kiosk / Console / Display          HTTP + WebSocket (axum)
//!  ──────────────────────────  ────────────────────────────────────
//!        POST /tickets   ┐
//!        POST /admin/…   ├──▶ handler ──▶ Store::send_and_wait_for
//!        GET  /queue     ┘                     │
//!                                              ▼
//!                                       DispatchReducer
//!                            validate → route → allocate → mutate
//!                                              │
//!                              one Effect::Future per command:
//!                       flush document → publish events → resolve
//!                                              │
//!                         ┌────────────────────┼──────────────────┐
//!                         ▼                    ▼                  ▼
//!                 JsonFileRepository    TopicBroadcaster    result action
//!                 (whole-document       (per-department     (answers the
//!                  write-then-rename)    WebSocket fan-out)  waiting handler)
//! ```
//!
//! # Key Properties
//!
//! - **Single writer**: all queue mutations flow through one store; the
//!   reducer runs them one at a time, so no scope ever has two `serving`
//!   tickets and no number is ever double-issued.
//! - **Derived queues**: waiting lines are rebuilt from ticket records on
//!   load; the stored document never contains queue arrays.
//! - **Fire-and-forget side effects**: a failed flush or publish is logged
//!   and never rolls back the accepted state change.
//!
//! # Usage
//!
//! See the [engine] module for the reducer and its feature tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod migration;
pub mod repository;
pub mod server;
pub mod types;

pub use catalog::Catalog;
pub use config::Config;
pub use engine::{
    DispatchAction, DispatchReducer, DispatchState, ProductionDispatchEnvironment, QueueEvent,
};
pub use error::DispatchError;
pub use repository::{InMemoryRepository, JsonFileRepository, QueueRepository, StateDocument};
pub use server::{AppState, DispatchStore, build_router};
