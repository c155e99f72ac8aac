//! Read-only ticket projections

use crate::core::{ClientId, TechnicianId, Ticket, TicketId};
use crate::error::{DeskError, EntityKind, Result};
use crate::storage::TicketRepository;

pub struct TicketQueries<'a, R: TicketRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: TicketRepository + ?Sized> TicketQueries<'a, R> {
    pub const fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// All tickets, oldest first
    pub fn find_all(&self) -> Result<Vec<Ticket>> {
        Ok(sorted(self.repository.load_all()?))
    }

    pub fn find_by_client(&self, client_id: &ClientId) -> Result<Vec<Ticket>> {
        Ok(sorted(
            self.repository.find(|t| &t.client_id == client_id)?,
        ))
    }

    pub fn find_by_technician(&self, technician_id: &TechnicianId) -> Result<Vec<Ticket>> {
        Ok(sorted(self.repository.find(|t| t.is_assigned_to(technician_id))?))
    }

    pub fn find_one(&self, id: &TicketId) -> Result<Option<Ticket>> {
        match self.repository.load(id) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(DeskError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Like [`find_one`](Self::find_one) but a missing ticket is an error
    pub fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.find_one(id)?
            .ok_or_else(|| DeskError::not_found(EntityKind::Ticket, id))
    }
}

fn sorted(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    tickets
}
