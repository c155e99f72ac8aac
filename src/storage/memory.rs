//! In-memory store
//!
//! Keeps every record in process memory behind `RwLock`s. Used when the
//! engine is embedded in another program and throughout the test suite.

use super::repository::{DirectoryRepository, IdentityDirectory, TicketRepository};
use crate::core::{
    Category, CategoryId, Client, ClientId, Technician, TechnicianId, TechnicianRecord, Ticket,
    TicketId,
};
use crate::error::{DeskError, EntityKind, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    clients: RwLock<HashMap<ClientId, Client>>,
    technicians: RwLock<HashMap<TechnicianId, Technician>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

fn poisoned<T>(_: PoisonError<T>) -> DeskError {
    DeskError::LockPoisoned("memory store".to_string())
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketRepository for MemoryStore {
    fn save(&self, ticket: &Ticket) -> Result<()> {
        self.tickets
            .write()
            .map_err(poisoned)?
            .insert(ticket.id, ticket.clone());
        Ok(())
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        self.tickets
            .read()
            .map_err(poisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| DeskError::not_found(EntityKind::Ticket, id))
    }

    fn load_all(&self) -> Result<Vec<Ticket>> {
        Ok(self.tickets.read().map_err(poisoned)?.values().cloned().collect())
    }

    fn exists(&self, id: &TicketId) -> Result<bool> {
        Ok(self.tickets.read().map_err(poisoned)?.contains_key(id))
    }

    fn find<F>(&self, predicate: F) -> Result<Vec<Ticket>>
    where
        F: Fn(&Ticket) -> bool,
    {
        Ok(self
            .tickets
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect())
    }

    fn count<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&Ticket) -> bool,
    {
        Ok(self
            .tickets
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|t| predicate(t))
            .count())
    }
}

impl IdentityDirectory for MemoryStore {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>> {
        Ok(self.clients.read().map_err(poisoned)?.get(id).cloned())
    }

    fn get_category(&self, id: &CategoryId) -> Result<Option<Category>> {
        Ok(self.categories.read().map_err(poisoned)?.get(id).cloned())
    }

    fn get_technician(
        &self,
        id: &TechnicianId,
        include_assigned_tickets: bool,
    ) -> Result<Option<TechnicianRecord>> {
        let Some(technician) = self.technicians.read().map_err(poisoned)?.get(id).cloned() else {
            return Ok(None);
        };
        let assigned_tickets = if include_assigned_tickets {
            Some(self.find(|t| t.is_assigned_to(id))?)
        } else {
            None
        };
        Ok(Some(TechnicianRecord {
            technician,
            assigned_tickets,
        }))
    }
}

impl DirectoryRepository for MemoryStore {
    fn save_client(&self, client: &Client) -> Result<()> {
        self.clients
            .write()
            .map_err(poisoned)?
            .insert(client.id, client.clone());
        Ok(())
    }

    fn save_technician(&self, technician: &Technician) -> Result<()> {
        self.technicians
            .write()
            .map_err(poisoned)?
            .insert(technician.id, technician.clone());
        Ok(())
    }

    fn save_category(&self, category: &Category) -> Result<()> {
        self.categories
            .write()
            .map_err(poisoned)?
            .insert(category.id, category.clone());
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        let mut clients: Vec<_> = self
            .clients
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        clients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(clients)
    }

    fn list_technicians(&self) -> Result<Vec<Technician>> {
        let mut technicians: Vec<_> = self
            .technicians
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        technicians.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(technicians)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<_> = self
            .categories
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Priority, Status, TicketBuilder};

    fn ticket_for(technician: Option<TechnicianId>, status: Status) -> Ticket {
        let mut builder = TicketBuilder::new()
            .title("Ticket")
            .description("Description")
            .priority(Priority::Medium)
            .status(status);
        if let Some(technician) = technician {
            builder = builder.technician(technician);
        }
        builder.build()
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let ticket = ticket_for(None, Status::Open);
        store.save(&ticket).unwrap();

        assert_eq!(store.load(&ticket.id).unwrap(), ticket);
        assert!(store.exists(&ticket.id).unwrap());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.load(&TicketId::new()).unwrap_err();
        assert!(matches!(
            err,
            DeskError::NotFound {
                kind: EntityKind::Ticket,
                ..
            }
        ));
    }

    #[test]
    fn test_save_replaces_existing() {
        let store = MemoryStore::new();
        let mut ticket = ticket_for(None, Status::Open);
        store.save(&ticket).unwrap();
        ticket.title = "Renamed".to_string();
        store.save(&ticket).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
        assert_eq!(store.load(&ticket.id).unwrap().title, "Renamed");
    }

    #[test]
    fn test_technician_lookup_includes_current_tickets() {
        let store = MemoryStore::new();
        let technician = Technician::new("Ada");
        store.save_technician(&technician).unwrap();

        let without = store.get_technician(&technician.id, false).unwrap().unwrap();
        assert!(without.assigned_tickets.is_none());

        store
            .save(&ticket_for(Some(technician.id), Status::InProgress))
            .unwrap();
        store.save(&ticket_for(None, Status::InProgress)).unwrap();

        let with = store.get_technician(&technician.id, true).unwrap().unwrap();
        assert_eq!(with.assigned_tickets.unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_records_are_none() {
        let store = MemoryStore::new();
        assert!(store.get_client(&ClientId::new()).unwrap().is_none());
        assert!(store.get_category(&CategoryId::new()).unwrap().is_none());
        assert!(
            store
                .get_technician(&TechnicianId::new(), true)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_find_and_count() {
        let store = MemoryStore::new();
        store.save(&ticket_for(None, Status::Open)).unwrap();
        store.save(&ticket_for(None, Status::InProgress)).unwrap();
        store.save(&ticket_for(None, Status::Closed)).unwrap();

        let open = store.find(|t| t.status == Status::Open).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(store.count(|t| t.status != Status::Closed).unwrap(), 2);
    }
}
