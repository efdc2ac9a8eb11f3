//! # Kiosk Testing
//!
//! Testing utilities and helpers for the kiosk queue engine.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Test helpers and builders
//! - Property-based testing utilities
//! - Assertion helpers for reducers and stores
//!
//! ## Example
//!
//! ```ignore
//! use kiosk_testing::test_clock;
//! use kiosk_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_ticket_flow() {
//!     let env = test_environment();
//!     let store = Store::new(DispatchState::default(), DispatchReducer, env);
//!
//!     store.send(DispatchAction::SubmitTicket {
//!         request_id: RequestId::new(),
//!         submission,
//!     }).await?;
//!
//!     let issued = store.state(|s| s.ticket_count()).await;
//!     assert_eq!(issued, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use kiosk_core::environment::Clock;

/// Ergonomic reducer testing with Given-When-Then syntax
pub mod reducer_test;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration as ChronoDuration;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use kiosk_testing::mocks::FixedClock;
    /// use kiosk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading
    ///
    /// Useful for queue ordering tests where issue timestamps must be
    /// strictly increasing without sleeping in the test.
    #[derive(Debug, Clone)]
    pub struct SteppingClock {
        current: Arc<Mutex<DateTime<Utc>>>,
        step: ChronoDuration,
    }

    impl SteppingClock {
        /// Create a stepping clock starting at `start`, advancing by `step` per reading
        #[must_use]
        pub fn new(start: DateTime<Utc>, step: ChronoDuration) -> Self {
            Self {
                current: Arc::new(Mutex::new(start)),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let reading = *current;
            *current += self.step;
            reading
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Create a stepping clock for tests (starts 2025-01-01, one second per reading)
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(test_clock().now(), ChronoDuration::seconds(1))
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use kiosk_core::reducer::Reducer;
    use kiosk_runtime::Store;
    use std::time::Duration;

    /// Poll a store until a state predicate holds or the timeout expires
    ///
    /// Replaces sleep-based waits in tests that observe effect-driven
    /// state changes. Returns `true` if the predicate held before the
    /// timeout.
    pub async fn eventually_state<S, A, E, R, F>(
        store: &Store<S, A, E, R>,
        predicate: F,
        timeout: Duration,
    ) -> bool
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: Fn(&S) -> bool,
    {
        let start = std::time::Instant::now();
        loop {
            if store.state(&predicate).await {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Initialize tracing for a test binary
    ///
    /// Safe to call from multiple tests; only the first call installs the
    /// subscriber.
    pub fn init_tracing() {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with(fmt::layer().with_test_writer())
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Strategy producing valid queue ticket numbers (1 through 99)
    pub fn ticket_number() -> impl Strategy<Value = u8> {
        1u8..=99
    }

    /// Strategy producing plausible service window counts
    pub fn window_count() -> impl Strategy<Value = u8> {
        1u8..=8
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, stepping_clock, test_clock};
pub use reducer_test::ReducerTest;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_stepping_clock_advances() {
        let clock = stepping_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time2 - time1, ChronoDuration::seconds(1));
    }
}
