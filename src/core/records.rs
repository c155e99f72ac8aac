//! Directory records referenced by tickets

use super::{CategoryId, ClientId, TechnicianId, Ticket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer that raises tickets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: name.into(),
            company: None,
            contact_email: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A person who works tickets
///
/// `available` is informational; assignment does not consult it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const fn default_available() -> bool {
    true
}

impl Technician {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TechnicianId::new(),
            name: name.into(),
            specialty: None,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Grouping for tickets, such as "Hardware Incident"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A technician as returned by the identity directory
///
/// `assigned_tickets` is populated only when the lookup asked for it, and
/// then reflects the ticket set at the moment of the lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicianRecord {
    pub technician: Technician,
    pub assigned_tickets: Option<Vec<Ticket>>,
}
