//! Queue number allocation.
//!
//! Numbers cycle through 1-99 per department. Allocation advances from the
//! last-issued number and skips any number still held by a non-terminal
//! ticket, so a number only returns to the pool when its ticket completes or
//! cancels. The caller runs this inside the store's write lock; two
//! simultaneous submissions can never observe the same `last_issued`.

use crate::types::QueueNumber;
use std::collections::HashSet;

/// Pick the next free queue number.
///
/// Starts one past `last_issued` (or at 1 for a fresh department), wraps 99
/// back to 1, and skips numbers in `active`. Returns `None` when every number
/// in the cycle is held by an active ticket — the range vastly exceeds any
/// realistic queue depth, so this is a defensive limit, not an expected case.
#[must_use]
pub fn next_number(
    last_issued: Option<QueueNumber>,
    active: &HashSet<QueueNumber>,
) -> Option<QueueNumber> {
    let mut candidate = match last_issued {
        Some(number) => number.wrapping_next(),
        None => QueueNumber::MIN,
    };

    for _ in 0..QueueNumber::MAX.get() {
        if !active.contains(&candidate) {
            return Some(candidate);
        }
        candidate = candidate.wrapping_next();
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;
    use kiosk_testing::properties::ticket_number;
    use proptest::prelude::*;

    fn n(value: u8) -> QueueNumber {
        QueueNumber::new(value).unwrap()
    }

    #[test]
    fn fresh_department_starts_at_one() {
        let active = HashSet::new();
        assert_eq!(next_number(None, &active), Some(n(1)));
    }

    #[test]
    fn advances_from_last_issued() {
        let active = HashSet::new();
        assert_eq!(next_number(Some(n(5)), &active), Some(n(6)));
    }

    #[test]
    fn skips_numbers_held_by_active_tickets() {
        let active: HashSet<_> = [n(6), n(7)].into_iter().collect();
        assert_eq!(next_number(Some(n(5)), &active), Some(n(8)));
    }

    #[test]
    fn wraps_after_ninety_nine() {
        let active = HashSet::new();
        assert_eq!(next_number(Some(n(99)), &active), Some(n(1)));
    }

    #[test]
    fn wraps_and_skips_active_low_numbers() {
        let active: HashSet<_> = [n(1), n(2)].into_iter().collect();
        assert_eq!(next_number(Some(n(99)), &active), Some(n(3)));
    }

    #[test]
    fn exhausted_cycle_returns_none() {
        let active: HashSet<_> = (1..=99).map(n).collect();
        assert_eq!(next_number(Some(n(42)), &active), None);
    }

    #[test]
    fn one_free_slot_is_always_found() {
        // 98 of 99 numbers taken; the lone free number must be returned
        // regardless of where the cursor sits.
        let active: HashSet<_> = (1..=99).filter(|v| *v != 57).map(n).collect();
        assert_eq!(next_number(Some(n(56)), &active), Some(n(57)));
        assert_eq!(next_number(Some(n(57)), &active), Some(n(57)));
        assert_eq!(next_number(None, &active), Some(n(57)));
    }

    proptest! {
        #[test]
        fn allocation_never_collides_with_active(
            last in proptest::option::of(ticket_number()),
            taken in proptest::collection::hash_set(ticket_number(), 0..90),
        ) {
            let last_issued = last.map(n);
            let active: HashSet<_> = taken.iter().copied().map(n).collect();

            let issued = next_number(last_issued, &active)
                .expect("cycle with free numbers must allocate");
            prop_assert!(!active.contains(&issued));
            prop_assert!(issued.get() >= 1 && issued.get() <= 99);
        }

        #[test]
        fn sequential_allocations_are_distinct(start in ticket_number()) {
            // Issue the whole cycle from an arbitrary starting point while
            // keeping every ticket active; all 99 numbers must come out
            // exactly once before exhaustion.
            let mut active = HashSet::new();
            let mut last = Some(n(start));

            for _ in 0..99 {
                let Some(issued) = next_number(last, &active) else {
                    return Err(TestCaseError::fail("exhausted before 99 allocations"));
                };
                prop_assert!(active.insert(issued), "duplicate number issued");
                last = Some(issued);
            }
            prop_assert_eq!(next_number(last, &active), None);
        }
    }
}
