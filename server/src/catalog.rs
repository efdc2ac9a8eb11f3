//! Service catalog: which services each department offers, the alias table
//! used to resolve free-text kiosk input, and the configured windows.
//!
//! The catalog is loaded once at startup from a JSON file (camelCase fields,
//! same document conventions as the state store) and is immutable at runtime.
//! When no file is configured the built-in campus catalog is used, which is
//! also what the integration tests run against.

use crate::migration::{migrate_windows, WindowDocument};
use crate::types::{Department, Service, ServiceId, Window, WindowId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Catalog load failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// File could not be read
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid catalog JSON
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One department's slice of the catalog.
#[derive(Debug, Clone)]
pub struct DepartmentCatalog {
    /// Which department this belongs to
    pub department: Department,
    /// Services offered, in display order
    pub services: Vec<Service>,
    /// Alias -> canonical service name (keys as written in the file;
    /// normalization happens when the dispatch state is built)
    pub aliases: HashMap<String, String>,
    /// Configured windows; empty means the department runs one shared line
    pub windows: Vec<Window>,
}

/// The full campus catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Per-department entries
    pub departments: Vec<DepartmentCatalog>,
}

impl Catalog {
    /// Load a catalog from a JSON file, applying the legacy window-document
    /// migration. Logs how many windows were migrated.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let mut document: CatalogDocument = serde_json::from_str(&raw)?;

        let mut migrated = 0;
        for department in &mut document.departments {
            migrated += migrate_windows(&mut department.windows);
        }
        if migrated > 0 {
            tracing::info!(
                path = %path.display(),
                windows = migrated,
                "migrated legacy window assignments in catalog"
            );
        }

        Ok(document.into_catalog())
    }

    /// The built-in campus catalog used when no file is configured.
    ///
    /// Ids are fixed so that state persisted against the built-in catalog
    /// survives a restart.
    #[must_use]
    pub fn built_in() -> Self {
        let transcript = service_id(0x0a);
        let enrollment = service_id(0x0b);
        let diploma = service_id(0x0c);
        let application = service_id(0x0d);
        let documents = service_id(0x0e);
        let tuition = service_id(0x0f);
        let certificate = service_id(0x10);

        let registrar = DepartmentCatalog {
            department: Department::Registrar,
            services: vec![
                service(transcript, Department::Registrar, "Transcript Request", "records", 10),
                service(enrollment, Department::Registrar, "Enrollment Verification", "records", 5),
                service(diploma, Department::Registrar, "Diploma Request", "records", 15),
            ],
            aliases: HashMap::from([
                ("transcript".to_string(), "Transcript Request".to_string()),
                ("enroll".to_string(), "Enrollment Verification".to_string()),
                ("coe".to_string(), "Enrollment Verification".to_string()),
            ]),
            windows: vec![
                window(window_id(0x01), Department::Registrar, 1, "Window 1", vec![transcript, enrollment]),
                window(window_id(0x02), Department::Registrar, 2, "Window 2", vec![enrollment, diploma]),
            ],
        };

        let admissions = DepartmentCatalog {
            department: Department::Admissions,
            services: vec![
                service(application, Department::Admissions, "Application Inquiry", "admissions", 10),
                service(documents, Department::Admissions, "Document Submission", "admissions", 5),
            ],
            aliases: HashMap::from([(
                "apply".to_string(),
                "Application Inquiry".to_string(),
            )]),
            windows: vec![window(
                window_id(0x03),
                Department::Admissions,
                1,
                "Window 1",
                vec![application, documents],
            )],
        };

        // The cashier runs one shared line, no windows.
        let cashier = DepartmentCatalog {
            department: Department::Cashier,
            services: vec![
                service(tuition, Department::Cashier, "Tuition Payment", "payments", 5),
                service(certificate, Department::Cashier, "Certificate Fee", "payments", 5),
            ],
            aliases: HashMap::from([("payment".to_string(), "Tuition Payment".to_string())]),
            windows: Vec::new(),
        };

        Self {
            departments: vec![registrar, admissions, cashier],
        }
    }

    /// Look up one department's entry.
    #[must_use]
    pub fn department(&self, department: Department) -> Option<&DepartmentCatalog> {
        self.departments.iter().find(|d| d.department == department)
    }
}

fn service_id(tag: u128) -> ServiceId {
    ServiceId::from_uuid(Uuid::from_u128(0x6ff9_a1c2_u128 << 96 | tag))
}

fn window_id(tag: u128) -> WindowId {
    WindowId::from_uuid(Uuid::from_u128(0x6ff9_a1c2_u128 << 96 | tag << 8))
}

fn service(
    id: ServiceId,
    department: Department,
    name: &str,
    category: &str,
    estimated_minutes: u32,
) -> Service {
    Service {
        id,
        department,
        name: name.to_string(),
        category: category.to_string(),
        estimated_minutes,
    }
}

fn window(
    id: WindowId,
    department: Department,
    number: u8,
    label: &str,
    service_ids: Vec<ServiceId>,
) -> Window {
    Window {
        id,
        department,
        number,
        label: label.to_string(),
        open: true,
        service_ids,
        operator: None,
    }
}

// ===== File Format =====

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    departments: Vec<DepartmentDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentDocument {
    department: Department,
    #[serde(default)]
    services: Vec<ServiceDocument>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    windows: Vec<WindowDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDocument {
    id: ServiceId,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default = "default_estimate")]
    estimated_minutes: u32,
}

const fn default_estimate() -> u32 {
    5
}

impl CatalogDocument {
    fn into_catalog(self) -> Catalog {
        Catalog {
            departments: self
                .departments
                .into_iter()
                .map(|entry| {
                    let department = entry.department;
                    DepartmentCatalog {
                        department,
                        services: entry
                            .services
                            .into_iter()
                            .map(|s| Service {
                                id: s.id,
                                department,
                                name: s.name,
                                category: s.category,
                                estimated_minutes: s.estimated_minutes,
                            })
                            .collect(),
                        aliases: entry.aliases,
                        windows: entry
                            .windows
                            .into_iter()
                            .map(|w| w.into_window(department))
                            .collect(),
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_covers_every_department() {
        let catalog = Catalog::built_in();
        for department in Department::ALL {
            assert!(catalog.department(department).is_some(), "{department}");
        }
    }

    #[test]
    fn built_in_ids_are_stable_across_calls() {
        let a = Catalog::built_in();
        let b = Catalog::built_in();
        let first = |c: &Catalog| c.departments[0].services[0].id;
        assert_eq!(first(&a), first(&b));
    }

    #[test]
    fn catalog_file_with_legacy_windows_parses() {
        let json = r#"{
            "departments": [
                {
                    "department": "registrar",
                    "services": [
                        {
                            "id": "6ff9a1c2-0000-0000-0000-00000000000a",
                            "name": "Transcript Request",
                            "category": "records",
                            "estimatedMinutes": 10
                        }
                    ],
                    "aliases": { "transcript": "Transcript Request" },
                    "windows": [
                        {
                            "id": "6ff9a1c2-0000-0000-0000-000000000100",
                            "number": 1,
                            "label": "Window 1",
                            "serviceId": "6ff9a1c2-0000-0000-0000-00000000000a"
                        }
                    ]
                }
            ]
        }"#;

        let mut document: CatalogDocument = serde_json::from_str(json).unwrap();
        let migrated: usize = document
            .departments
            .iter_mut()
            .map(|d| migrate_windows(&mut d.windows))
            .sum();
        let catalog = document.into_catalog();

        assert_eq!(migrated, 1);
        let registrar = catalog.department(Department::Registrar).unwrap();
        assert_eq!(registrar.windows[0].service_ids.len(), 1);
        assert!(registrar.windows[0].open);
    }
}
