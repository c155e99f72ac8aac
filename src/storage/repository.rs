use crate::core::{
    Category, CategoryId, Client, ClientId, Technician, TechnicianId, TechnicianRecord, Ticket,
    TicketId,
};
use crate::error::Result;

/// Persistence port for tickets
///
/// Implemented by [`MemoryStore`](super::MemoryStore) and
/// [`FileStorage`](super::FileStorage). Tickets are never deleted.
pub trait TicketRepository: Send + Sync {
    /// Inserts or replaces a ticket
    fn save(&self, ticket: &Ticket) -> Result<()>;

    /// Loads a ticket by ID, failing with `NotFound` when absent
    fn load(&self, id: &TicketId) -> Result<Ticket>;

    fn load_all(&self) -> Result<Vec<Ticket>>;

    fn exists(&self, id: &TicketId) -> Result<bool>;

    /// Tickets for which `predicate` holds, in no particular order
    fn find<F>(&self, predicate: F) -> Result<Vec<Ticket>>
    where
        F: Fn(&Ticket) -> bool,
    {
        Ok(self.load_all()?.into_iter().filter(predicate).collect())
    }

    fn count<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&Ticket) -> bool,
    {
        Ok(self.load_all()?.iter().filter(|t| predicate(t)).count())
    }
}

/// Read-only lookups of the records tickets refer to
///
/// Lookups have no side effects. A technician lookup that asks for assigned
/// tickets must read them from the current ticket set, never from a cache:
/// the workload counter relies on that freshness.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityDirectory: Send + Sync {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>>;

    fn get_category(&self, id: &CategoryId) -> Result<Option<Category>>;

    fn get_technician(
        &self,
        id: &TechnicianId,
        include_assigned_tickets: bool,
    ) -> Result<Option<TechnicianRecord>>;
}

/// Write side of the directory, used by administration and seeding
pub trait DirectoryRepository: IdentityDirectory {
    fn save_client(&self, client: &Client) -> Result<()>;

    fn save_technician(&self, technician: &Technician) -> Result<()>;

    fn save_category(&self, category: &Category) -> Result<()>;

    fn list_clients(&self) -> Result<Vec<Client>>;

    fn list_technicians(&self) -> Result<Vec<Technician>>;

    fn list_categories(&self) -> Result<Vec<Category>>;
}

/// Everything a desk backend provides
pub trait Store: TicketRepository + DirectoryRepository {}

/// Implementation of Store for types that implement both traits
impl<T> Store for T where T: TicketRepository + DirectoryRepository {}
