//! Service-name resolution and window selection.
//!
//! Submissions name a service; routing resolves that name to a catalog
//! service (case-insensitive, whitespace-normalized, with an explicit alias
//! table for legacy kiosk labels) and then picks the least-loaded open window
//! assigned to it. There is no fuzzy matching: an unresolved name is the
//! caller's problem, not a guess.

use crate::types::{Service, ServiceId, Window};
use std::collections::HashMap;

/// Normalize a service name for matching: trim, collapse inner whitespace,
/// lowercase.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve a requested service name against the catalog.
///
/// Tries the canonical names first, then the alias table. Alias keys are
/// expected pre-normalized; alias values are canonical names and are
/// normalized before lookup.
#[must_use]
pub fn resolve_service<'a>(
    services: &'a [Service],
    aliases: &HashMap<String, String>,
    requested: &str,
) -> Option<&'a Service> {
    let wanted = normalize(requested);
    if wanted.is_empty() {
        return None;
    }

    if let Some(service) = services.iter().find(|s| normalize(&s.name) == wanted) {
        return Some(service);
    }

    let canonical = normalize(aliases.get(&wanted)?);
    services.iter().find(|s| normalize(&s.name) == canonical)
}

/// Pick the window a new ticket should be routed to.
///
/// Candidates are open windows assigned the service. The least-loaded
/// candidate wins; on a tie, the lowest window number (deterministic).
/// Returns `None` when no open window serves the service.
pub fn pick_window<'a, I, F>(windows: I, service: ServiceId, load: F) -> Option<&'a Window>
where
    I: IntoIterator<Item = &'a Window>,
    F: Fn(&Window) -> usize,
{
    windows
        .into_iter()
        .filter(|w| w.open && w.serves(service))
        .min_by_key(|w| (load(w), w.number))
}
