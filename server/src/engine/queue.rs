//! Per-scope waiting line structure.
//!
//! A [`ScopeQueue`] holds ticket ids only; ticket records live in the
//! department's ticket map. The waiting list keeps one structural invariant:
//! a priority prefix followed by a regular suffix, each in arrival order.
//! Queues are rebuilt from ticket records at startup, so this type carries no
//! serde.

use crate::types::{QueueNumber, TicketId};

/// One waiting line: a department's shared line or a single window's line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeQueue {
    waiting: Vec<TicketId>,
    skipped: Vec<TicketId>,
    serving: Option<TicketId>,
    displayed: Option<QueueNumber>,
}

impl ScopeQueue {
    /// Rebuild a queue from persisted ticket records.
    pub(crate) const fn from_parts(
        waiting: Vec<TicketId>,
        skipped: Vec<TicketId>,
        serving: Option<TicketId>,
        displayed: Option<QueueNumber>,
    ) -> Self {
        Self {
            waiting,
            skipped,
            serving,
            displayed,
        }
    }

    /// Insert a ticket at its priority-aware position and return the number
    /// of waiting tickets ahead of it.
    ///
    /// A priority ticket goes ahead of every regular ticket but behind
    /// earlier-arrived priority tickets; a regular ticket joins the tail.
    pub fn enqueue<F>(&mut self, id: TicketId, priority: bool, is_priority: F) -> usize
    where
        F: Fn(TicketId) -> bool,
    {
        let position = if priority {
            self.waiting.partition_point(|t| is_priority(*t))
        } else {
            self.waiting.len()
        };
        self.waiting.insert(position, id);
        position
    }

    /// Next ticket eligible for serving, without mutating anything.
    #[must_use]
    pub fn peek_next(&self) -> Option<TicketId> {
        self.waiting.first().copied()
    }

    /// Remove and return the head of the waiting list.
    pub fn pop_next(&mut self) -> Option<TicketId> {
        if self.waiting.is_empty() {
            None
        } else {
            Some(self.waiting.remove(0))
        }
    }

    /// Ticket currently at the counter, if any.
    #[must_use]
    pub const fn serving(&self) -> Option<TicketId> {
        self.serving
    }

    /// Vacate the serving slot, leaving the displayed number untouched.
    ///
    /// Used by call-next, where the display is immediately replaced.
    pub fn take_serving(&mut self) -> Option<TicketId> {
        self.serving.take()
    }

    /// Vacate the serving slot and clear the display.
    pub fn finish_serving(&mut self) -> Option<TicketId> {
        self.displayed = None;
        self.serving.take()
    }

    /// Put a ticket at the counter and show its number.
    pub const fn begin_serving(&mut self, id: TicketId, number: QueueNumber) {
        self.serving = Some(id);
        self.displayed = Some(number);
    }

    /// Park a ticket in the skipped list.
    pub fn push_skipped(&mut self, id: TicketId) {
        self.skipped.push(id);
    }

    /// Remove a ticket from the skipped list. Returns `false` if absent.
    pub fn remove_skipped(&mut self, id: TicketId) -> bool {
        match self.skipped.iter().position(|t| *t == id) {
            Some(index) => {
                self.skipped.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove a ticket wherever it sits: waiting list, skipped list, or the
    /// serving slot (which also clears the display). Returns `false` if the
    /// ticket was not in this queue.
    pub fn remove(&mut self, id: TicketId) -> bool {
        if let Some(index) = self.waiting.iter().position(|t| *t == id) {
            self.waiting.remove(index);
            return true;
        }
        if self.remove_skipped(id) {
            return true;
        }
        if self.serving == Some(id) {
            self.serving = None;
            self.displayed = None;
            return true;
        }
        false
    }

    /// Step the displayed number back by one, wrapping 1 to 99.
    ///
    /// Display correction only; no ticket is touched. A no-op when nothing is
    /// displayed.
    pub fn step_display_back(&mut self) {
        self.displayed = self.displayed.map(QueueNumber::wrapping_prev);
    }

    /// Number currently shown on the board for this scope.
    #[must_use]
    pub const fn displayed(&self) -> Option<QueueNumber> {
        self.displayed
    }

    /// Waiting tickets in serving order.
    #[must_use]
    pub fn waiting(&self) -> &[TicketId] {
        &self.waiting
    }

    /// Skipped tickets in the order they were skipped.
    #[must_use]
    pub fn skipped(&self) -> &[TicketId] {
        &self.skipped
    }

    /// Position of a ticket in the waiting list.
    #[must_use]
    pub fn position_of(&self, id: TicketId) -> Option<usize> {
        self.waiting.iter().position(|t| *t == id)
    }

    /// Routing load: waiting tickets plus the one being served.
    #[must_use]
    pub fn load(&self) -> usize {
        self.waiting.len() + usize::from(self.serving.is_some())
    }
}
