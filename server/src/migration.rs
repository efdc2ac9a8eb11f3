//! Legacy window-document migration.
//!
//! Early deployments stored a single `serviceId` per window; current
//! documents carry a `serviceIds` array. [`WindowDocument`] tolerates both
//! forms on load, and [`migrate_windows`] folds the singular field into the
//! array so everything downstream sees only the plural form. The next save
//! writes the plural form exclusively — the migration runs once per document,
//! not forever.
//!
//! Core types ([`Window`]) never carry the legacy field.

use crate::types::{Department, ServiceId, Window, WindowId};
use serde::{Deserialize, Serialize};

/// Stored form of a service window.
///
/// Field names are camelCase to match the historical document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDocument {
    /// Unique id
    pub id: WindowId,
    /// Staff-facing window number
    pub number: u8,
    /// Display label
    pub label: String,
    /// Legacy singular assignment; drained into `service_ids` on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    /// Services the window can handle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_ids: Vec<ServiceId>,
    /// Open/closed flag
    #[serde(default = "default_open")]
    pub open: bool,
    /// Assigned staff member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

const fn default_open() -> bool {
    true
}

impl WindowDocument {
    /// Convert into the core type. Call [`migrate_windows`] first; any legacy
    /// field still present at this point is dropped.
    #[must_use]
    pub fn into_window(self, department: Department) -> Window {
        Window {
            id: self.id,
            department,
            number: self.number,
            label: self.label,
            open: self.open,
            service_ids: self.service_ids,
            operator: self.operator,
        }
    }

    /// Stored form of a core window (always the plural shape).
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        Self {
            id: window.id,
            number: window.number,
            label: window.label.clone(),
            service_id: None,
            service_ids: window.service_ids.clone(),
            open: window.open,
            operator: window.operator.clone(),
        }
    }
}

/// Fold legacy `serviceId` fields into `serviceIds`.
///
/// Returns the number of windows that needed migrating so the caller can log
/// it. A document carrying both fields keeps the array and merges the
/// singular id into it if missing.
pub fn migrate_windows(windows: &mut [WindowDocument]) -> usize {
    let mut migrated = 0;
    for window in windows {
        if let Some(legacy) = window.service_id.take() {
            if !window.service_ids.contains(&legacy) {
                window.service_ids.push(legacy);
            }
            migrated += 1;
        }
    }
    migrated
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn legacy_singular_field_is_folded_into_the_array() {
        let json = r#"{
            "id": "6ff9a1c2-0000-0000-0000-000000000001",
            "number": 1,
            "label": "Window 1",
            "serviceId": "6ff9a1c2-0000-0000-0000-00000000000a",
            "open": true
        }"#;

        let mut windows = vec![serde_json::from_str::<WindowDocument>(json).unwrap()];
        let migrated = migrate_windows(&mut windows);

        assert_eq!(migrated, 1);
        assert!(windows[0].service_id.is_none());
        assert_eq!(windows[0].service_ids.len(), 1);
    }

    #[test]
    fn current_documents_pass_through_untouched() {
        let json = r#"{
            "id": "6ff9a1c2-0000-0000-0000-000000000001",
            "number": 2,
            "label": "Window 2",
            "serviceIds": [
                "6ff9a1c2-0000-0000-0000-00000000000a",
                "6ff9a1c2-0000-0000-0000-00000000000b"
            ],
            "open": false,
            "operator": "m.reyes"
        }"#;

        let mut windows = vec![serde_json::from_str::<WindowDocument>(json).unwrap()];
        let migrated = migrate_windows(&mut windows);

        assert_eq!(migrated, 0);
        assert_eq!(windows[0].service_ids.len(), 2);
        assert!(!windows[0].open);
    }

    #[test]
    fn both_fields_present_merges_without_duplicating() {
        let duplicated = r#"{
            "id": "6ff9a1c2-0000-0000-0000-000000000001",
            "number": 3,
            "label": "Window 3",
            "serviceId": "6ff9a1c2-0000-0000-0000-00000000000a",
            "serviceIds": ["6ff9a1c2-0000-0000-0000-00000000000a"]
        }"#;

        let mut windows = vec![serde_json::from_str::<WindowDocument>(duplicated).unwrap()];
        assert_eq!(migrate_windows(&mut windows), 1);
        assert_eq!(windows[0].service_ids.len(), 1);
    }

    #[test]
    fn saved_form_never_contains_the_legacy_field() {
        let window = Window {
            id: WindowId::new(),
            department: Department::Registrar,
            number: 1,
            label: "Window 1".to_string(),
            open: true,
            service_ids: vec![ServiceId::new()],
            operator: None,
        };

        let json = serde_json::to_string(&WindowDocument::from_window(&window)).unwrap();
        assert!(json.contains("serviceIds"));
        assert!(!json.contains("\"serviceId\""));
    }

    #[test]
    fn round_trips_through_the_core_type() {
        let doc = WindowDocument {
            id: WindowId::new(),
            number: 4,
            label: "Priority Lane".to_string(),
            service_id: None,
            service_ids: vec![ServiceId::new()],
            open: true,
            operator: Some("a.cruz".to_string()),
        };

        let window = doc.clone().into_window(Department::Cashier);
        assert_eq!(window.department, Department::Cashier);
        assert_eq!(WindowDocument::from_window(&window), doc);
    }
}
