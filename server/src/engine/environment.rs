//! Dependencies the dispatch reducer reaches through.
//!
//! The reducer itself is pure state transitions; everything observable from
//! outside (time, persistence, broadcast) comes in through the environment so
//! tests can pin the clock and swap the repository.

use crate::engine::events::QueueEvent;
use crate::repository::QueueRepository;
use kiosk_core::{Clock, SystemClock};
use kiosk_web::TopicBroadcaster;
use std::sync::Arc;

/// What the dispatch reducer needs from the outside world.
pub trait DispatchEnvironment: Send + Sync {
    /// Source of time for ticket timestamps.
    fn clock(&self) -> &dyn Clock;

    /// Where committed state is flushed.
    fn repository(&self) -> &Arc<dyn QueueRepository>;

    /// Per-department event fan-out.
    fn broadcaster(&self) -> &TopicBroadcaster<QueueEvent>;

    /// Minutes of service assumed per waiting ticket in wait estimates.
    fn average_service_minutes(&self) -> u32;
}

/// Production wiring: system clock plus whatever repository and broadcaster
/// the server was started with.
#[derive(Clone)]
pub struct ProductionDispatchEnvironment {
    clock: Arc<dyn Clock>,
    repository: Arc<dyn QueueRepository>,
    broadcaster: TopicBroadcaster<QueueEvent>,
    average_service_minutes: u32,
}

impl ProductionDispatchEnvironment {
    /// Create a production environment with the system clock.
    #[must_use]
    pub fn new(
        repository: Arc<dyn QueueRepository>,
        broadcaster: TopicBroadcaster<QueueEvent>,
        average_service_minutes: u32,
    ) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            repository,
            broadcaster,
            average_service_minutes,
        }
    }

    /// Replace the clock. Tests pin it to a fixed instant.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl DispatchEnvironment for ProductionDispatchEnvironment {
    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn repository(&self) -> &Arc<dyn QueueRepository> {
        &self.repository
    }

    fn broadcaster(&self) -> &TopicBroadcaster<QueueEvent> {
        &self.broadcaster
    }

    fn average_service_minutes(&self) -> u32 {
        self.average_service_minutes
    }
}
