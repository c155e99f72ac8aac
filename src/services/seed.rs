//! Demo data for a fresh desk
//!
//! Seeding is idempotent: records are matched by name and only missing ones
//! are inserted.

use super::directory::{DirectoryAdmin, NewCategory, NewClient, NewTechnician};
use crate::error::{DeskError, Result};
use crate::storage::{DirectoryRepository, LockKey, LockManager};
use serde::Serialize;

const SEED_CATEGORIES: [(&str, &str); 3] = [
    ("Request", "General requests"),
    ("Hardware Incident", "Hardware problems"),
    ("Software Incident", "Software problems"),
];

const DEMO_TECHNICIAN: &str = "Technician Demo";
const DEMO_CLIENT: &str = "Client Demo";

/// Names of the records a seeding run inserted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categories: Vec<String>,
    pub technicians: Vec<String>,
    pub clients: Vec<String>,
}

impl SeedReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.technicians.is_empty() && self.clients.is_empty()
    }
}

/// Insert the demo records that are missing
///
/// The whole run holds [`LockKey::Seed`], so two concurrent runs cannot both
/// insert the demo technician or client.
pub fn seed_directory<D, L>(directory: &D, locks: &L) -> Result<SeedReport>
where
    D: DirectoryRepository + ?Sized,
    L: LockManager,
{
    let _lock = locks.acquire(&LockKey::Seed)?;
    let admin = DirectoryAdmin::new(directory, locks);
    let mut report = SeedReport::default();

    for (name, description) in SEED_CATEGORIES {
        if admin.find_category_by_name(name)?.is_none() {
            match admin.register_category(NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
            }) {
                Ok(_) => report.categories.push(name.to_string()),
                // Added by `category add` since the check above
                Err(DeskError::InvalidInput(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    if !admin.technicians()?.iter().any(|t| t.name == DEMO_TECHNICIAN) {
        admin.register_technician(NewTechnician {
            name: DEMO_TECHNICIAN.to_string(),
            specialty: Some("General".to_string()),
            available: true,
        })?;
        report.technicians.push(DEMO_TECHNICIAN.to_string());
    }

    if !admin.clients()?.iter().any(|c| c.name == DEMO_CLIENT) {
        admin.register_client(NewClient {
            name: DEMO_CLIENT.to_string(),
            company: Some("Company Demo".to_string()),
            contact_email: Some("contact@demo.com".to_string()),
        })?;
        report.clients.push(DEMO_CLIENT.to_string());
    }

    Ok(report)
}
