//! Dispatch state: the in-memory source of truth for every department.
//!
//! [`DepartmentState`] owns one department's catalog slice, ticket records,
//! numbering cursor, and per-scope queues, and implements the queue
//! transitions (submit, call, skip, transfer, ...). [`DispatchState`] is the
//! root aggregate the reducer mutates; it always holds an entry for every
//! department, so lookups are infallible.
//!
//! Queues are derived data. They are rebuilt from ticket records on startup
//! and never persisted, which keeps the stored document a flat list of
//! tickets plus window definitions.

use crate::catalog::{Catalog, DepartmentCatalog};
use crate::engine::events::{PublicTicket, QueueSnapshot, ScopeSnapshot};
use crate::engine::queue::ScopeQueue;
use crate::engine::{allocator, router};
use crate::error::DispatchError;
use crate::types::{
    CustomerInfo, Department, QueueNumber, Service, ServiceId, Ticket, TicketId, TicketStatus,
    Window, WindowId,
};
use kiosk_core::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Result of a successful ticket submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The ticket as stored
    pub ticket: Ticket,
    /// Label of the routed window, if the department has windows
    pub window_label: Option<String>,
    /// Tickets waiting ahead at the moment of submission
    pub waiting_ahead: usize,
}

/// Result of a successful call-next.
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    /// Ticket implicitly completed by this call, if one was being served
    pub completed: Option<TicketId>,
    /// Ticket now being served
    pub serving: Ticket,
}

/// Result of a successful transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferOutcome {
    /// Queue key the ticket left
    pub source_key: Option<WindowId>,
    /// Window number the ticket left, absent for a shared line
    pub source_window: Option<u8>,
    /// Queue key the ticket joined
    pub target_key: WindowId,
    /// Whether the ticket was being served when transferred
    pub was_serving: bool,
}

/// One department's queues, tickets, and catalog slice.
#[derive(Debug, Clone)]
pub struct DepartmentState {
    department: Department,
    services: Vec<Service>,
    /// Normalized alias -> canonical service name
    aliases: HashMap<String, String>,
    windows: BTreeMap<WindowId, Window>,
    tickets: HashMap<TicketId, Ticket>,
    last_issued: Option<QueueNumber>,
    /// Keyed by window id; `None` is the shared departmental line
    queues: HashMap<Option<WindowId>, ScopeQueue>,
}

impl DepartmentState {
    /// Build a department from its catalog entry. Alias keys are normalized
    /// here so request-time resolution is a plain map lookup.
    #[must_use]
    pub fn new(catalog: &DepartmentCatalog) -> Self {
        Self {
            department: catalog.department,
            services: catalog.services.clone(),
            aliases: catalog
                .aliases
                .iter()
                .map(|(alias, canonical)| (router::normalize(alias), canonical.clone()))
                .collect(),
            windows: catalog.windows.iter().map(|w| (w.id, w.clone())).collect(),
            tickets: HashMap::new(),
            last_issued: None,
            queues: HashMap::new(),
        }
    }

    fn empty(department: Department) -> Self {
        Self {
            department,
            services: Vec::new(),
            aliases: HashMap::new(),
            windows: BTreeMap::new(),
            tickets: HashMap::new(),
            last_issued: None,
            queues: HashMap::new(),
        }
    }

    /// Which department this is.
    #[must_use]
    pub const fn department(&self) -> Department {
        self.department
    }

    /// Services offered, in catalog order.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Configured windows, ordered by id.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    /// Whether this department dispatches through windows at all.
    #[must_use]
    pub fn has_windows(&self) -> bool {
        !self.windows.is_empty()
    }

    /// Look up a ticket record.
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    /// Look up a window by its staff-facing number.
    #[must_use]
    pub fn window_by_number(&self, number: u8) -> Option<&Window> {
        self.windows.values().find(|w| w.number == number)
    }

    /// Cursor of the numbering cycle.
    #[must_use]
    pub const fn last_issued(&self) -> Option<QueueNumber> {
        self.last_issued
    }

    /// Total tickets waiting across every scope of the department.
    #[must_use]
    pub fn waiting_count(&self) -> usize {
        self.queues.values().map(|q| q.waiting().len()).sum()
    }

    /// Map a staff-supplied window number onto a queue key.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when the number does not match a
    /// configured window.
    pub fn resolve_window_key(&self, window: Option<u8>) -> Result<Option<WindowId>, DispatchError> {
        match window {
            None => Ok(None),
            Some(number) => self
                .window_by_number(number)
                .map(|w| Some(w.id))
                .ok_or_else(|| DispatchError::not_found("Window", number)),
        }
    }

    /// Submit a ticket: resolve the service, route it, draw a number, and
    /// enqueue it in its priority band.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotFound`] for an unknown service,
    /// [`DispatchError::NoWindowAvailable`] when no open window serves it,
    /// and [`DispatchError::ExhaustedRange`] when all 99 numbers are live.
    pub fn submit(
        &mut self,
        ticket_id: TicketId,
        service_request: &str,
        customer: CustomerInfo,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, DispatchError> {
        let Some(service) = router::resolve_service(&self.services, &self.aliases, service_request)
        else {
            return Err(DispatchError::not_found("Service", service_request.trim()));
        };
        let service_id = service.id;
        let service_name = service.name.clone();

        // Departments without windows run one shared line.
        let routed = if self.windows.is_empty() {
            None
        } else {
            let load = |window: &Window| self.queues.get(&Some(window.id)).map_or(0, ScopeQueue::load);
            let Some(window) = router::pick_window(self.windows.values(), service_id, load) else {
                return Err(DispatchError::NoWindowAvailable {
                    department: self.department,
                    service: service_name,
                });
            };
            Some((window.id, window.label.clone()))
        };

        let active = self.active_numbers();
        let Some(number) = allocator::next_number(self.last_issued, &active) else {
            return Err(DispatchError::ExhaustedRange {
                department: self.department,
            });
        };
        self.last_issued = Some(number);

        let (window_id, window_label) = match routed {
            Some((id, label)) => (Some(id), Some(label)),
            None => (None, None),
        };
        let priority = customer.priority.is_priority();
        let ticket = Ticket {
            id: ticket_id,
            department: self.department,
            service_id,
            window_id,
            customer,
            status: TicketStatus::Waiting,
            number,
            created_at: now,
            status_changed_at: now,
        };
        self.tickets.insert(ticket_id, ticket.clone());

        let tickets = &self.tickets;
        let queue = self.queues.entry(window_id).or_default();
        let waiting_ahead = queue.enqueue(ticket_id, priority, |id| {
            tickets.get(&id).is_some_and(|t| t.customer.priority.is_priority())
        });

        Ok(SubmitOutcome {
            ticket,
            window_label,
            waiting_ahead,
        })
    }

    /// Call the next waiting ticket to the counter.
    ///
    /// A ticket already being served in the scope is completed first; a scope
    /// never serves two tickets at once.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when nothing is waiting. The
    /// serving ticket is left untouched in that case.
    pub fn call_next(
        &mut self,
        window_key: Option<WindowId>,
        now: DateTime<Utc>,
    ) -> Result<AdvanceOutcome, DispatchError> {
        let scope = self.scope_label(window_key);
        let Some(next_id) = self.queues.get_mut(&window_key).and_then(ScopeQueue::pop_next)
        else {
            return Err(DispatchError::not_found("waiting ticket", scope));
        };
        let completed = self.complete_serving(window_key, now, false);

        let Some(ticket) = self.tickets.get_mut(&next_id) else {
            return Err(DispatchError::not_found("Ticket", next_id));
        };
        ticket.status = TicketStatus::Serving;
        if window_key.is_some() {
            ticket.window_id = window_key;
        }
        ticket.status_changed_at = now;
        let serving = ticket.clone();

        self.queues
            .entry(window_key)
            .or_default()
            .begin_serving(next_id, serving.number);

        Ok(AdvanceOutcome { completed, serving })
    }

    /// Set the next waiting ticket aside without serving it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when nothing is waiting.
    pub fn skip_next(
        &mut self,
        window_key: Option<WindowId>,
        now: DateTime<Utc>,
    ) -> Result<Ticket, DispatchError> {
        let scope = self.scope_label(window_key);
        let Some(id) = self.queues.get_mut(&window_key).and_then(ScopeQueue::pop_next) else {
            return Err(DispatchError::not_found("waiting ticket", scope));
        };
        self.queues.entry(window_key).or_default().push_skipped(id);

        let Some(ticket) = self.tickets.get_mut(&id) else {
            return Err(DispatchError::not_found("Ticket", id));
        };
        ticket.status = TicketStatus::Skipped;
        ticket.status_changed_at = now;
        Ok(ticket.clone())
    }

    /// Complete the ticket being served without calling another.
    ///
    /// Idempotent: returns `None` when nothing was being served.
    pub fn stop_serving(
        &mut self,
        window_key: Option<WindowId>,
        now: DateTime<Utc>,
    ) -> Option<Ticket> {
        let id = self.complete_serving(window_key, now, true)?;
        self.tickets.get(&id).cloned()
    }

    /// Step the display one number backwards (wrapping 1 to 99).
    ///
    /// Display-only: no ticket changes state. Returns the new displayed
    /// number, or `None` when the scope has never displayed one.
    pub fn step_display_back(&mut self, window_key: Option<WindowId>) -> Option<QueueNumber> {
        let queue = self.queues.get_mut(&window_key)?;
        queue.step_display_back();
        queue.displayed()
    }

    /// Return a skipped ticket to the tail of its priority band.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when the ticket is not in the
    /// scope's skipped set.
    pub fn requeue_skipped(
        &mut self,
        window_key: Option<WindowId>,
        ticket_id: TicketId,
        now: DateTime<Utc>,
    ) -> Result<usize, DispatchError> {
        let Some(queue) = self.queues.get_mut(&window_key) else {
            return Err(DispatchError::not_found("skipped ticket", ticket_id));
        };
        if !queue.remove_skipped(ticket_id) {
            return Err(DispatchError::not_found("skipped ticket", ticket_id));
        }

        let priority = {
            let Some(ticket) = self.tickets.get_mut(&ticket_id) else {
                return Err(DispatchError::not_found("Ticket", ticket_id));
            };
            ticket.status = TicketStatus::Waiting;
            ticket.status_changed_at = now;
            ticket.customer.priority.is_priority()
        };

        let tickets = &self.tickets;
        let queue = self.queues.entry(window_key).or_default();
        let position = queue.enqueue(ticket_id, priority, |id| {
            tickets.get(&id).is_some_and(|t| t.customer.priority.is_priority())
        });
        Ok(position)
    }

    /// Move a waiting or serving ticket to another window's waiting band.
    ///
    /// The target must be assigned the ticket's service; open/closed is not
    /// checked, so staff can hand a ticket to a window that is about to open.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotFound`] for an unknown ticket or window,
    /// [`DispatchError::InvalidTransfer`] when the target window is not
    /// assigned the service, and [`DispatchError::Validation`] for tickets
    /// that are skipped or already closed out.
    pub fn transfer(
        &mut self,
        ticket_id: TicketId,
        target_window: u8,
        now: DateTime<Utc>,
    ) -> Result<TransferOutcome, DispatchError> {
        let Some(target) = self.window_by_number(target_window) else {
            return Err(DispatchError::not_found("Window", target_window));
        };
        let target_id = target.id;
        let target_serves = |service: ServiceId| {
            self.windows
                .get(&target_id)
                .is_some_and(|w| w.serves(service))
        };

        let (status, service_id, source_key, priority) = {
            let Some(ticket) = self.tickets.get(&ticket_id) else {
                return Err(DispatchError::not_found("Ticket", ticket_id));
            };
            (
                ticket.status,
                ticket.service_id,
                ticket.window_id,
                ticket.customer.priority.is_priority(),
            )
        };
        if !matches!(status, TicketStatus::Waiting | TicketStatus::Serving) {
            return Err(DispatchError::validation(
                "only waiting or serving tickets can be transferred",
            ));
        }
        if !target_serves(service_id) {
            return Err(DispatchError::InvalidTransfer {
                window: target_window,
            });
        }

        let source_window = source_key.and_then(|id| self.windows.get(&id)).map(|w| w.number);
        let was_serving = status == TicketStatus::Serving;
        if let Some(queue) = self.queues.get_mut(&source_key) {
            let _ = queue.remove(ticket_id);
        }

        if let Some(ticket) = self.tickets.get_mut(&ticket_id) {
            ticket.status = TicketStatus::Waiting;
            ticket.window_id = Some(target_id);
            ticket.status_changed_at = now;
        }
        let tickets = &self.tickets;
        let queue = self.queues.entry(Some(target_id)).or_default();
        let _ = queue.enqueue(ticket_id, priority, |id| {
            tickets.get(&id).is_some_and(|t| t.customer.priority.is_priority())
        });

        Ok(TransferOutcome {
            source_key,
            source_window,
            target_key: target_id,
            was_serving,
        })
    }

    /// Cancel a ticket, releasing its number. Returns the stored record and
    /// the scope it occupied.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotFound`] for an unknown ticket and
    /// [`DispatchError::Validation`] when it is already closed out.
    pub fn cancel(
        &mut self,
        ticket_id: TicketId,
        now: DateTime<Utc>,
    ) -> Result<(Ticket, Option<WindowId>), DispatchError> {
        let (status, source_key) = {
            let Some(ticket) = self.tickets.get(&ticket_id) else {
                return Err(DispatchError::not_found("Ticket", ticket_id));
            };
            (ticket.status, ticket.window_id)
        };
        if status.is_terminal() {
            return Err(DispatchError::validation(
                "ticket is already in a terminal state",
            ));
        }

        if let Some(queue) = self.queues.get_mut(&source_key) {
            let _ = queue.remove(ticket_id);
        }
        let Some(ticket) = self.tickets.get_mut(&ticket_id) else {
            return Err(DispatchError::not_found("Ticket", ticket_id));
        };
        ticket.status = TicketStatus::Cancelled;
        ticket.status_changed_at = now;
        Ok((ticket.clone(), source_key))
    }

    /// Open or close a window. Closing stops routed submissions; tickets
    /// already waiting at the window stay put.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] for an unknown window number.
    pub fn set_window_open(&mut self, number: u8, open: bool) -> Result<Window, DispatchError> {
        let Some(window) = self.windows.values_mut().find(|w| w.number == number) else {
            return Err(DispatchError::not_found("Window", number));
        };
        window.open = open;
        Ok(window.clone())
    }

    /// Waiting position of a ticket, if it is waiting.
    #[must_use]
    pub fn ticket_position(&self, ticket_id: TicketId) -> Option<usize> {
        let ticket = self.tickets.get(&ticket_id)?;
        if ticket.status != TicketStatus::Waiting {
            return None;
        }
        self.queues.get(&ticket.window_id)?.position_of(ticket_id)
    }

    /// Public-safe projection of a stored ticket.
    #[must_use]
    pub fn public_projection(&self, ticket: &Ticket) -> PublicTicket {
        PublicTicket {
            number: ticket.number,
            service: self.service_name(ticket.service_id),
            priority: ticket.customer.priority,
            window: ticket
                .window_id
                .and_then(|id| self.windows.get(&id))
                .map(|w| w.label.clone()),
        }
    }

    /// Public-safe snapshot of one scope.
    #[must_use]
    pub fn public_snapshot(&self, window_key: Option<WindowId>) -> QueueSnapshot {
        let window = window_key.and_then(|id| self.windows.get(&id));
        let queue = self.queues.get(&window_key);
        QueueSnapshot {
            department: self.department,
            window: window.map(|w| w.number),
            window_label: window.map(|w| w.label.clone()),
            waiting: queue.map_or_else(Vec::new, |q| {
                q.waiting()
                    .iter()
                    .filter_map(|id| self.public_ticket(*id))
                    .collect()
            }),
            serving: queue
                .and_then(ScopeQueue::serving)
                .and_then(|id| self.public_ticket(id)),
            displayed: queue.and_then(ScopeQueue::displayed),
        }
    }

    /// Department-wide public view: every waiting ticket across all scopes,
    /// priority band first, then arrival order. Used when a windowed
    /// department is queried without naming a window.
    #[must_use]
    pub fn department_overview(&self) -> QueueSnapshot {
        let mut waiting: Vec<&Ticket> = self
            .tickets
            .values()
            .filter(|t| t.status == TicketStatus::Waiting)
            .collect();
        waiting.sort_by_key(|t| {
            (
                !t.customer.priority.is_priority(),
                t.created_at,
                t.number.get(),
            )
        });
        QueueSnapshot {
            department: self.department,
            window: None,
            window_label: None,
            waiting: waiting.iter().map(|t| self.public_projection(t)).collect(),
            serving: None,
            displayed: None,
        }
    }

    /// Staff snapshot of one scope, with full ticket records.
    #[must_use]
    pub fn admin_snapshot(&self, window_key: Option<WindowId>) -> ScopeSnapshot {
        let window = window_key.and_then(|id| self.windows.get(&id));
        let queue = self.queues.get(&window_key);
        let records = |ids: &[TicketId]| {
            ids.iter()
                .filter_map(|id| self.tickets.get(id).cloned())
                .collect()
        };
        ScopeSnapshot {
            department: self.department,
            window: window.map(|w| w.number),
            window_label: window.map(|w| w.label.clone()),
            waiting: queue.map_or_else(Vec::new, |q| records(q.waiting())),
            skipped: queue.map_or_else(Vec::new, |q| records(q.skipped())),
            serving: queue
                .and_then(ScopeQueue::serving)
                .and_then(|id| self.tickets.get(&id).cloned()),
            displayed: queue.and_then(ScopeQueue::displayed),
        }
    }

    /// All ticket records, unordered. Used when building the stored document.
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }

    /// Replace window and ticket records from a stored document, then rebuild
    /// the queues. Catalog windows are kept when the document has none.
    pub(crate) fn restore_records(
        &mut self,
        windows: Vec<Window>,
        tickets: Vec<Ticket>,
        last_issued: Option<QueueNumber>,
    ) {
        if !windows.is_empty() {
            self.windows = windows.into_iter().map(|w| (w.id, w)).collect();
        }
        self.last_issued = last_issued;
        self.tickets = tickets.into_iter().map(|t| (t.id, t)).collect();
        self.rebuild_queues();
    }

    fn public_ticket(&self, id: TicketId) -> Option<PublicTicket> {
        self.tickets.get(&id).map(|t| self.public_projection(t))
    }

    fn service_name(&self, id: ServiceId) -> String {
        self.services
            .iter()
            .find(|s| s.id == id)
            .map_or_else(|| "unknown".to_string(), |s| s.name.clone())
    }

    fn scope_label(&self, window_key: Option<WindowId>) -> String {
        window_key.and_then(|id| self.windows.get(&id)).map_or_else(
            || self.department.to_string(),
            |window| format!("{} window {}", self.department, window.number),
        )
    }

    /// Numbers held by non-terminal tickets.
    fn active_numbers(&self) -> HashSet<QueueNumber> {
        self.tickets
            .values()
            .filter(|t| t.is_active())
            .map(|t| t.number)
            .collect()
    }

    fn complete_serving(
        &mut self,
        window_key: Option<WindowId>,
        now: DateTime<Utc>,
        clear_display: bool,
    ) -> Option<TicketId> {
        let queue = self.queues.get_mut(&window_key)?;
        let id = if clear_display {
            queue.finish_serving()
        } else {
            queue.take_serving()
        }?;
        if let Some(ticket) = self.tickets.get_mut(&id) {
            ticket.status = TicketStatus::Completed;
            ticket.status_changed_at = now;
        }
        Some(id)
    }

    fn rebuild_queues(&mut self) {
        self.queues.clear();

        // At most one serving ticket per scope; demote extras from a
        // hand-edited document, keeping the most recent.
        let mut serving_by_scope: HashMap<Option<WindowId>, Vec<(DateTime<Utc>, u8, TicketId)>> =
            HashMap::new();
        for ticket in self.tickets.values() {
            if ticket.status == TicketStatus::Serving {
                serving_by_scope.entry(ticket.window_id).or_default().push((
                    ticket.status_changed_at,
                    ticket.number.get(),
                    ticket.id,
                ));
            }
        }
        let mut serving: HashMap<Option<WindowId>, (TicketId, QueueNumber)> = HashMap::new();
        let mut demoted: Vec<TicketId> = Vec::new();
        for (key, mut entries) in serving_by_scope {
            entries.sort_by_key(|(at, number, _)| (*at, *number));
            if let Some((_, _, id)) = entries.pop() {
                if let Some(number) = self.tickets.get(&id).map(|t| t.number) {
                    serving.insert(key, (id, number));
                }
            }
            demoted.extend(entries.into_iter().map(|(_, _, id)| id));
        }
        if !demoted.is_empty() {
            tracing::warn!(
                department = %self.department,
                count = demoted.len(),
                "stored document had multiple serving tickets in one scope; demoted extras to waiting"
            );
            for id in &demoted {
                if let Some(ticket) = self.tickets.get_mut(id) {
                    ticket.status = TicketStatus::Waiting;
                }
            }
        }

        let mut waiting: HashMap<Option<WindowId>, Vec<(bool, DateTime<Utc>, u8, TicketId)>> =
            HashMap::new();
        let mut skipped: HashMap<Option<WindowId>, Vec<(DateTime<Utc>, u8, TicketId)>> =
            HashMap::new();
        for ticket in self.tickets.values() {
            match ticket.status {
                TicketStatus::Waiting => waiting.entry(ticket.window_id).or_default().push((
                    !ticket.customer.priority.is_priority(),
                    ticket.created_at,
                    ticket.number.get(),
                    ticket.id,
                )),
                TicketStatus::Skipped => skipped.entry(ticket.window_id).or_default().push((
                    ticket.status_changed_at,
                    ticket.number.get(),
                    ticket.id,
                )),
                TicketStatus::Serving | TicketStatus::Completed | TicketStatus::Cancelled => {}
            }
        }

        let mut keys: HashSet<Option<WindowId>> = HashSet::new();
        keys.extend(waiting.keys().copied());
        keys.extend(skipped.keys().copied());
        keys.extend(serving.keys().copied());

        for key in keys {
            let mut wait_entries = waiting.remove(&key).unwrap_or_default();
            wait_entries.sort_by_key(|(regular, at, number, _)| (*regular, *at, *number));
            let mut skip_entries = skipped.remove(&key).unwrap_or_default();
            skip_entries.sort_by_key(|(at, number, _)| (*at, *number));
            let serving_entry = serving.get(&key).copied();
            self.queues.insert(
                key,
                ScopeQueue::from_parts(
                    wait_entries.into_iter().map(|(_, _, _, id)| id).collect(),
                    skip_entries.into_iter().map(|(_, _, id)| id).collect(),
                    serving_entry.map(|(id, _)| id),
                    serving_entry.map(|(_, number)| number),
                ),
            );
        }
    }
}

/// Root dispatch state: one [`DepartmentState`] per department, always
/// present.
#[derive(Debug, Clone)]
pub struct DispatchState {
    departments: [DepartmentState; 3],
}

impl DispatchState {
    /// Build fresh state from a catalog. Departments missing from the
    /// catalog come up empty but present.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            departments: Department::ALL.map(|department| {
                catalog
                    .department(department)
                    .map_or_else(|| DepartmentState::empty(department), DepartmentState::new)
            }),
        }
    }

    /// One department's state.
    #[must_use]
    pub fn department(&self, department: Department) -> &DepartmentState {
        &self.departments[department.index()]
    }

    /// Mutable access to one department's state.
    pub fn department_mut(&mut self, department: Department) -> &mut DepartmentState {
        &mut self.departments[department.index()]
    }

    /// All departments, in display order.
    pub fn departments(&self) -> impl Iterator<Item = &DepartmentState> {
        self.departments.iter()
    }

    /// Find a ticket record across departments.
    #[must_use]
    pub fn find_ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.departments.iter().find_map(|d| d.ticket(id))
    }

    /// Which department holds a ticket.
    #[must_use]
    pub fn find_ticket_department(&self, id: TicketId) -> Option<Department> {
        self.departments
            .iter()
            .find(|d| d.ticket(id).is_some())
            .map(DepartmentState::department)
    }
}

impl Default for DispatchState {
    /// State over the built-in catalog.
    fn default() -> Self {
        Self::from_catalog(&Catalog::built_in())
    }
}
