use super::{CategoryId, ClientId, Priority, Status, TechnicianId, Ticket, TicketId};
use chrono::{DateTime, Utc};

/// Assembles a [`Ticket`] field by field
///
/// Unset identifiers get fresh random ids; unset status and priority fall back
/// to `open` and `medium`.
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    client_id: Option<ClientId>,
    category_id: Option<CategoryId>,
    technician_id: Option<TechnicianId>,
    created_at: Option<DateTime<Utc>>,
}

impl TicketBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Only fixtures and imports need this; new tickets start `open`.
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    #[must_use]
    pub const fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub const fn technician(mut self, technician_id: TechnicianId) -> Self {
        self.technician_id = Some(technician_id);
        self
    }

    /// Backdate the ticket; `updated_at` takes the same value
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> Ticket {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        Ticket {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            client_id: self.client_id.unwrap_or_default(),
            category_id: self.category_id.unwrap_or_default(),
            technician_id: self.technician_id,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_builder() {
        let client = ClientId::new();
        let category = CategoryId::new();
        let technician = TechnicianId::new();
        let ticket = TicketBuilder::new()
            .title("Broken monitor")
            .description("No signal on HDMI")
            .priority(Priority::High)
            .client(client)
            .category(category)
            .technician(technician)
            .build();

        assert_eq!(ticket.title, "Broken monitor");
        assert_eq!(ticket.description, "No signal on HDMI");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.client_id, client);
        assert_eq!(ticket.category_id, category);
        assert_eq!(ticket.technician_id, Some(technician));
    }

    #[test]
    fn test_builder_defaults() {
        let ticket = TicketBuilder::new().build();
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.status, Status::Open);
        assert!(ticket.technician_id.is_none());
    }
}
