use super::{CategoryId, ClientId, Priority, Status, TechnicianId, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of support work tracked through the lifecycle
///
/// The client is fixed at creation. Category, technician and the scalar
/// fields may change through updates; status only changes through a
/// lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub client_id: ClientId,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<TechnicianId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Create an unassigned ticket in the `open` status
    #[must_use]
    pub fn new(
        title: String,
        description: String,
        priority: Priority,
        client_id: ClientId,
        category_id: CategoryId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TicketId::new(),
            title,
            description,
            status: Status::Open,
            priority,
            client_id,
            category_id,
            technician_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == Status::InProgress
    }

    #[must_use]
    pub fn is_assigned_to(&self, technician_id: &TechnicianId) -> bool {
        self.technician_id.as_ref() == Some(technician_id)
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
