//! The dispatch reducer: validates commands, applies queue transitions, and
//! emits effects that persist and broadcast the result.
//!
//! Every command resolves to exactly one result action carrying the caller's
//! request id. Rejections produce no persistence and no broadcast; accepted
//! commands flush the whole document and publish to the owning department's
//! topic. Persistence failures are logged and counted but never roll back
//! the in-memory state.

use crate::engine::actions::{DispatchAction, TicketSubmission};
use crate::engine::environment::{DispatchEnvironment, ProductionDispatchEnvironment};
use crate::engine::events::QueueEvent;
use crate::engine::state::DispatchState;
use crate::error::DispatchError;
use crate::repository::StateDocument;
use crate::types::{
    CustomerInfo, CustomerRole, Department, PriorityCategory, RequestId, Scope, TicketId, WindowId,
};
use kiosk_core::{smallvec, Effect, Reducer, SmallVec};
use kiosk_runtime::metrics::{BroadcastMetrics, QueueMetrics, RepositoryMetrics, TicketMetrics};
use std::sync::Arc;

type Effects = SmallVec<[Effect<DispatchAction>; 4]>;

/// Reducer over [`DispatchState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchReducer;

impl DispatchReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn submit(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        ticket_id: TicketId,
        submission: &TicketSubmission,
    ) -> Effects {
        let (department, customer) = match validate_submission(submission) {
            Ok(parts) => parts,
            Err(error) => {
                let label =
                    Department::from_name(&submission.department).map_or("unknown", Department::as_str);
                TicketMetrics::record_rejected(label, error.reason());
                return Self::reject(request_id, error);
            }
        };

        let now = env.clock().now();
        let outcome = match state
            .department_mut(department)
            .submit(ticket_id, &submission.service, customer, now)
        {
            Ok(outcome) => outcome,
            Err(error) => {
                TicketMetrics::record_rejected(department.as_str(), error.reason());
                return Self::reject(request_id, error);
            }
        };

        TicketMetrics::record_issued(
            department.as_str(),
            outcome.ticket.customer.priority.is_priority(),
        );
        let dept = state.department(department);
        QueueMetrics::record_depth(department.as_str(), dept.waiting_count());

        let snapshot = dept.public_snapshot(outcome.ticket.window_id);
        let window = snapshot.window;
        let events = vec![
            QueueEvent::TicketCreated {
                department,
                window,
                ticket: dept.public_projection(&outcome.ticket),
            },
            QueueEvent::QueueUpdate {
                department,
                window,
                snapshot,
            },
        ];

        let ahead = u32::try_from(outcome.waiting_ahead).unwrap_or(u32::MAX);
        let estimated_wait_minutes = ahead.saturating_mul(env.average_service_minutes());
        tracing::info!(
            %request_id,
            ticket = %outcome.ticket.id,
            department = %department,
            number = %outcome.ticket.number,
            "ticket issued"
        );
        Self::deliver(
            env,
            Some(StateDocument::from_state(state)),
            events,
            DispatchAction::TicketAccepted {
                request_id,
                ticket: outcome.ticket,
                window_label: outcome.window_label,
                estimated_wait_minutes,
            },
        )
    }

    fn cancel(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        ticket_id: TicketId,
    ) -> Effects {
        let Some(department) = state.find_ticket_department(ticket_id) else {
            return Self::reject(request_id, DispatchError::not_found("Ticket", ticket_id));
        };
        match state
            .department_mut(department)
            .cancel(ticket_id, env.clock().now())
        {
            Ok((ticket, window_key)) => {
                TicketMetrics::record_cancelled(department.as_str());
                let dept = state.department(department);
                QueueMetrics::record_depth(department.as_str(), dept.waiting_count());
                let snapshot = dept.public_snapshot(window_key);
                let window = snapshot.window;
                tracing::info!(%request_id, ticket = %ticket.id, department = %department, "ticket cancelled");
                Self::deliver(
                    env,
                    Some(StateDocument::from_state(state)),
                    vec![QueueEvent::QueueUpdate {
                        department,
                        window,
                        snapshot,
                    }],
                    DispatchAction::TicketCancelled {
                        request_id,
                        ticket_id,
                    },
                )
            }
            Err(error) => Self::reject(request_id, error),
        }
    }

    fn call_next(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        match state
            .department_mut(scope.department)
            .call_next(window_key, env.clock().now())
        {
            Ok(outcome) => {
                if outcome.completed.is_some() {
                    TicketMetrics::record_completed(scope.department.as_str());
                }
                tracing::info!(
                    %request_id,
                    scope = %scope,
                    number = %outcome.serving.number,
                    "called next ticket"
                );
                Self::scope_changed(state, env, request_id, scope.department, window_key, true)
            }
            Err(error) => Self::reject(request_id, error),
        }
    }

    fn skip(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        match state
            .department_mut(scope.department)
            .skip_next(window_key, env.clock().now())
        {
            Ok(ticket) => {
                TicketMetrics::record_skipped(scope.department.as_str());
                tracing::info!(%request_id, scope = %scope, number = %ticket.number, "skipped ticket");
                Self::scope_changed(state, env, request_id, scope.department, window_key, true)
            }
            Err(error) => Self::reject(request_id, error),
        }
    }

    /// Re-announce the scope without changing anything.
    fn recall(
        state: &DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        tracing::debug!(%request_id, scope = %scope, "recall");
        Self::scope_changed(state, env, request_id, scope.department, window_key, false)
    }

    /// Step the display backwards. Display-only, so nothing is persisted.
    fn previous(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        let displayed = state
            .department_mut(scope.department)
            .step_display_back(window_key);
        tracing::debug!(
            %request_id,
            scope = %scope,
            displayed = displayed.map(|n| n.get()),
            "display stepped back"
        );
        Self::scope_changed(state, env, request_id, scope.department, window_key, false)
    }

    fn stop(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        let completed = state
            .department_mut(scope.department)
            .stop_serving(window_key, env.clock().now());
        if let Some(ticket) = &completed {
            TicketMetrics::record_completed(scope.department.as_str());
            tracing::info!(%request_id, scope = %scope, number = %ticket.number, "serving completed");
        }
        // Idempotent: stopping an idle scope still resolves with a snapshot.
        Self::scope_changed(
            state,
            env,
            request_id,
            scope.department,
            window_key,
            completed.is_some(),
        )
    }

    fn transfer(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
        ticket_id: TicketId,
        target_window: u8,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        match state
            .department_mut(scope.department)
            .transfer(ticket_id, target_window, env.clock().now())
        {
            Ok(outcome) => {
                TicketMetrics::record_transferred(scope.department.as_str());
                let department = scope.department;
                let dept = state.department(department);
                QueueMetrics::record_depth(department.as_str(), dept.waiting_count());

                // Both affected scopes get fresh snapshots; the commanded
                // scope answers the caller.
                let source = dept.public_snapshot(outcome.source_key);
                let target = dept.public_snapshot(Some(outcome.target_key));
                let events = vec![
                    QueueEvent::QueueUpdate {
                        department,
                        window: source.window,
                        snapshot: source,
                    },
                    QueueEvent::QueueUpdate {
                        department,
                        window: target.window,
                        snapshot: target,
                    },
                ];
                tracing::info!(
                    %request_id,
                    ticket = %ticket_id,
                    from = outcome.source_window,
                    to = target_window,
                    was_serving = outcome.was_serving,
                    "ticket transferred"
                );
                Self::deliver(
                    env,
                    Some(StateDocument::from_state(state)),
                    events,
                    DispatchAction::QueueChanged {
                        request_id,
                        department,
                        snapshot: dept.admin_snapshot(window_key),
                    },
                )
            }
            Err(error) => Self::reject(request_id, error),
        }
    }

    fn requeue(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        scope: Scope,
        ticket_id: TicketId,
    ) -> Effects {
        let window_key = match state.department(scope.department).resolve_window_key(scope.window) {
            Ok(key) => key,
            Err(error) => return Self::reject(request_id, error),
        };
        match state
            .department_mut(scope.department)
            .requeue_skipped(window_key, ticket_id, env.clock().now())
        {
            Ok(position) => {
                TicketMetrics::record_requeued(scope.department.as_str());
                tracing::info!(%request_id, ticket = %ticket_id, scope = %scope, position, "skipped ticket requeued");
                Self::scope_changed(state, env, request_id, scope.department, window_key, true)
            }
            Err(error) => Self::reject(request_id, error),
        }
    }

    fn set_window_open(
        state: &mut DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        department: Department,
        window: u8,
        open: bool,
    ) -> Effects {
        match state.department_mut(department).set_window_open(window, open) {
            Ok(updated) => {
                let dept = state.department(department);
                let snapshot = dept.public_snapshot(Some(updated.id));
                tracing::info!(%request_id, department = %department, window, open, "window state changed");
                Self::deliver(
                    env,
                    Some(StateDocument::from_state(state)),
                    vec![QueueEvent::QueueUpdate {
                        department,
                        window: snapshot.window,
                        snapshot,
                    }],
                    DispatchAction::WindowUpdated {
                        request_id,
                        window: updated,
                    },
                )
            }
            Err(error) => Self::reject(request_id, error),
        }
    }

    /// Publish the scope's new shape and answer with a staff snapshot.
    fn scope_changed(
        state: &DispatchState,
        env: &ProductionDispatchEnvironment,
        request_id: RequestId,
        department: Department,
        window_key: Option<WindowId>,
        persist: bool,
    ) -> Effects {
        let dept = state.department(department);
        QueueMetrics::record_depth(department.as_str(), dept.waiting_count());
        let snapshot = dept.public_snapshot(window_key);
        let window = snapshot.window;
        let document = persist.then(|| StateDocument::from_state(state));
        Self::deliver(
            env,
            document,
            vec![QueueEvent::QueueUpdate {
                department,
                window,
                snapshot,
            }],
            DispatchAction::QueueChanged {
                request_id,
                department,
                snapshot: dept.admin_snapshot(window_key),
            },
        )
    }

    /// One effect that flushes, publishes, and resolves, in that order.
    fn deliver(
        env: &ProductionDispatchEnvironment,
        document: Option<StateDocument>,
        events: Vec<QueueEvent>,
        resolution: DispatchAction,
    ) -> Effects {
        let repository = Arc::clone(env.repository());
        let broadcaster = env.broadcaster().clone();
        smallvec![Effect::future(async move {
            if let Some(document) = document {
                if let Err(error) = repository.save(document).await {
                    RepositoryMetrics::record_flush_error();
                    tracing::warn!(error = %error, "failed to persist dispatch state");
                }
            }
            for event in events {
                let department = event.department();
                broadcaster.publish(department.as_str(), event).await;
                BroadcastMetrics::record_event(department.as_str());
            }
            Some(resolution)
        })]
    }

    /// Resolve the caller with a rejection. Nothing is persisted or
    /// published.
    fn reject(request_id: RequestId, error: DispatchError) -> Effects {
        tracing::debug!(%request_id, %error, "dispatch command rejected");
        smallvec![Effect::future(async move {
            Some(DispatchAction::CommandRejected { request_id, error })
        })]
    }
}

impl Reducer for DispatchReducer {
    type State = DispatchState;
    type Action = DispatchAction;
    type Environment = ProductionDispatchEnvironment;

    fn reduce(
        &self,
        state: &mut DispatchState,
        action: DispatchAction,
        env: &ProductionDispatchEnvironment,
    ) -> SmallVec<[Effect<DispatchAction>; 4]> {
        match action {
            DispatchAction::SubmitTicket {
                request_id,
                ticket_id,
                submission,
            } => Self::submit(state, env, request_id, ticket_id, &submission),
            DispatchAction::CancelTicket {
                request_id,
                ticket_id,
            } => Self::cancel(state, env, request_id, ticket_id),
            DispatchAction::CallNext { request_id, scope } => {
                Self::call_next(state, env, request_id, scope)
            }
            DispatchAction::Skip { request_id, scope } => Self::skip(state, env, request_id, scope),
            DispatchAction::Recall { request_id, scope } => {
                Self::recall(state, env, request_id, scope)
            }
            DispatchAction::Previous { request_id, scope } => {
                Self::previous(state, env, request_id, scope)
            }
            DispatchAction::Stop { request_id, scope } => Self::stop(state, env, request_id, scope),
            DispatchAction::Transfer {
                request_id,
                scope,
                ticket_id,
                target_window,
            } => Self::transfer(state, env, request_id, scope, ticket_id, target_window),
            DispatchAction::RequeueSkipped {
                request_id,
                scope,
                ticket_id,
            } => Self::requeue(state, env, request_id, scope, ticket_id),
            DispatchAction::SetWindowOpen {
                request_id,
                department,
                window,
                open,
            } => Self::set_window_open(state, env, request_id, department, window, open),
            // Results only exist to reach waiting callers via the action
            // broadcast.
            DispatchAction::TicketAccepted { .. }
            | DispatchAction::TicketCancelled { .. }
            | DispatchAction::QueueChanged { .. }
            | DispatchAction::WindowUpdated { .. }
            | DispatchAction::CommandRejected { .. } => smallvec![Effect::None],
        }
    }
}

fn validate_submission(
    submission: &TicketSubmission,
) -> Result<(Department, CustomerInfo), DispatchError> {
    let Some(department) = Department::from_name(&submission.department) else {
        return Err(DispatchError::not_found(
            "Department",
            submission.department.trim(),
        ));
    };
    let name = submission.name.trim();
    if name.is_empty() {
        return Err(DispatchError::validation("name must not be empty"));
    }
    let contact = submission.contact.trim();
    if !contact_looks_valid(contact) {
        return Err(DispatchError::validation(
            "contact must be a phone number or an email address",
        ));
    }
    let Some(role) = CustomerRole::from_name(&submission.role) else {
        return Err(DispatchError::validation(
            "role must be one of student, faculty, staff, alumni, visitor",
        ));
    };
    let priority = match submission.priority.as_deref().map(str::trim) {
        None | Some("") => PriorityCategory::Regular,
        Some(raw) => PriorityCategory::from_name(raw).ok_or_else(|| {
            DispatchError::validation("priority must be one of regular, pwd, senior_citizen, pregnant")
        })?,
    };
    Ok((
        department,
        CustomerInfo {
            name: name.to_string(),
            contact: contact.to_string(),
            role,
            priority,
        },
    ))
}

/// Loose contact check: an email with a dotted domain, or a phone number
/// with at least seven digits and common separators.
fn contact_looks_valid(contact: &str) -> bool {
    if contact.len() < 5 {
        return false;
    }
    if let Some((local, domain)) = contact.split_once('@') {
        return !local.is_empty() && domain.contains('.');
    }
    let digits = contact.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && contact
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
}
