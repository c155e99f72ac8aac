//! Shared fixtures for unit tests

#![cfg(test)]

use crate::core::{
    Category, Client, Priority, Status, Technician, TechnicianId, Ticket, TicketBuilder,
};
use crate::services::{NewTicket, TicketLifecycle};
use crate::storage::{DirectoryRepository, MemoryStore, ProcessLocks, TicketRepository};

/// An in-memory desk with one client, one category and one technician
pub struct TestDesk {
    pub engine: TicketLifecycle<MemoryStore, ProcessLocks>,
    pub client: Client,
    pub category: Category,
    pub technician: Technician,
}

impl TestDesk {
    pub fn new() -> Self {
        let store = MemoryStore::new();

        let mut client = Client::new("Client Test");
        client.company = Some("Company Test".to_string());
        let category = Category::new("Request");
        let technician = Technician::new("Technician Test");

        store.save_client(&client).expect("Failed to save client");
        store
            .save_category(&category)
            .expect("Failed to save category");
        store
            .save_technician(&technician)
            .expect("Failed to save technician");

        Self {
            engine: TicketLifecycle::new(store, ProcessLocks::new()),
            client,
            category,
            technician,
        }
    }

    /// Input for an unassigned ticket of the default client and category
    pub fn new_ticket(&self, title: &str) -> NewTicket {
        NewTicket {
            title: title.to_string(),
            description: format!("Description of {title}"),
            priority: Priority::Medium,
            category_id: self.category.id,
            client_id: self.client.id,
            technician_id: None,
        }
    }

    pub fn new_ticket_for(&self, title: &str, technician_id: TechnicianId) -> NewTicket {
        NewTicket {
            technician_id: Some(technician_id),
            ..self.new_ticket(title)
        }
    }

    /// Store `count` in-progress tickets for a technician, bypassing the engine
    pub fn fill_in_progress(&self, technician_id: &TechnicianId, count: usize) -> Vec<Ticket> {
        (0..count)
            .map(|i| {
                let ticket = TicketBuilder::new()
                    .title(format!("Busy {i}"))
                    .description("Already being worked on")
                    .status(Status::InProgress)
                    .client(self.client.id)
                    .category(self.category.id)
                    .technician(*technician_id)
                    .build();
                self.engine
                    .store()
                    .save(&ticket)
                    .expect("Failed to save ticket");
                ticket
            })
            .collect()
    }

    pub fn add_technician(&self, name: &str) -> Technician {
        let technician = Technician::new(name);
        self.engine
            .store()
            .save_technician(&technician)
            .expect("Failed to save technician");
        technician
    }

    pub fn add_client(&self, name: &str) -> Client {
        let client = Client::new(name);
        self.engine
            .store()
            .save_client(&client)
            .expect("Failed to save client");
        client
    }
}
