//! Dependency injection traits.
//!
//! External dependencies are abstracted behind traits and injected via the
//! environment parameter of a reducer. Production wires real implementations;
//! tests substitute deterministic ones.

use chrono::{DateTime, Utc};

/// Abstracts time so reducers stay deterministic under test.
///
/// # Examples
///
/// ```
/// use kiosk_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now.timestamp() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn clock_is_dyn_compatible() {
        let clock: &dyn Clock = &SystemClock;
        assert!(clock.now().timestamp() > 0);
    }
}
