//! Administration of clients, technicians and categories
//!
//! Every write is a read-modify-write under a lock from the same
//! [`LockManager`] the lifecycle engine uses. Category writes share one
//! [`LockKey::Categories`] lock so the name check and the save cannot
//! interleave with another category write.

use crate::core::{Category, CategoryId, Client, ClientId, Technician, TechnicianId};
use crate::error::{DeskError, EntityKind, Result};
use crate::storage::{DirectoryRepository, LockKey, LockManager};
use chrono::Utc;
use tracing::info;

/// Fields for registering a client
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub company: Option<String>,
    pub contact_email: Option<String>,
}

/// Fields for registering a technician
#[derive(Debug, Clone)]
pub struct NewTechnician {
    pub name: String,
    pub specialty: Option<String>,
    pub available: bool,
}

/// Fields for registering a category
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update of a client
///
/// `None` leaves a field untouched; a blank company or email clears it.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub company: Option<String>,
    pub contact_email: Option<String>,
}

/// Partial update of a technician; a blank specialty clears it
#[derive(Debug, Clone, Default)]
pub struct TechnicianChanges {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub available: Option<bool>,
}

/// Partial update of a category; a blank description clears it
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct DirectoryAdmin<'a, D: DirectoryRepository + ?Sized, L: LockManager> {
    directory: &'a D,
    locks: &'a L,
}

impl<'a, D, L> DirectoryAdmin<'a, D, L>
where
    D: DirectoryRepository + ?Sized,
    L: LockManager,
{
    pub const fn new(directory: &'a D, locks: &'a L) -> Self {
        Self { directory, locks }
    }

    pub fn register_client(&self, new: NewClient) -> Result<Client> {
        let name = require_name(new.name)?;
        let mut client = Client::new(name);
        client.company = non_blank(new.company);
        client.contact_email = non_blank(new.contact_email);

        let _lock = self.locks.acquire(&LockKey::Client(client.id))?;
        self.directory.save_client(&client)?;
        info!("Registered client {} ({})", client.name, client.id.short());
        Ok(client)
    }

    pub fn update_client(&self, id: &ClientId, changes: ClientChanges) -> Result<Client> {
        let _lock = self.locks.acquire(&LockKey::Client(*id))?;
        let mut client = self.client(id)?;

        if let Some(name) = changes.name {
            client.name = require_name(name)?;
        }
        if let Some(company) = changes.company {
            client.company = non_blank(Some(company));
        }
        if let Some(email) = changes.contact_email {
            client.contact_email = non_blank(Some(email));
        }
        client.updated_at = Utc::now();

        self.directory.save_client(&client)?;
        info!("Updated client {} ({})", client.name, client.id.short());
        Ok(client)
    }

    pub fn register_technician(&self, new: NewTechnician) -> Result<Technician> {
        let name = require_name(new.name)?;
        let mut technician = Technician::new(name);
        technician.specialty = non_blank(new.specialty);
        technician.available = new.available;

        let _lock = self.locks.acquire(&LockKey::Technician(technician.id))?;
        self.directory.save_technician(&technician)?;
        info!(
            "Registered technician {} ({})",
            technician.name,
            technician.id.short()
        );
        Ok(technician)
    }

    pub fn update_technician(
        &self,
        id: &TechnicianId,
        changes: TechnicianChanges,
    ) -> Result<Technician> {
        let _lock = self.locks.acquire(&LockKey::Technician(*id))?;
        let mut technician = self.technician(id)?;

        if let Some(name) = changes.name {
            technician.name = require_name(name)?;
        }
        if let Some(specialty) = changes.specialty {
            technician.specialty = non_blank(Some(specialty));
        }
        if let Some(available) = changes.available {
            technician.available = available;
        }
        technician.updated_at = Utc::now();

        self.directory.save_technician(&technician)?;
        info!(
            "Updated technician {} ({})",
            technician.name,
            technician.id.short()
        );
        Ok(technician)
    }

    pub fn set_technician_availability(
        &self,
        id: &TechnicianId,
        available: bool,
    ) -> Result<Technician> {
        self.update_technician(
            id,
            TechnicianChanges {
                available: Some(available),
                ..TechnicianChanges::default()
            },
        )
    }

    /// Register a category; names are unique, ignoring case
    pub fn register_category(&self, new: NewCategory) -> Result<Category> {
        let name = require_name(new.name)?;

        let _lock = self.locks.acquire(&LockKey::Categories)?;
        self.ensure_name_free(&name, None)?;
        let mut category = Category::new(name);
        category.description = non_blank(new.description);
        self.directory.save_category(&category)?;

        info!("Registered category {} ({})", category.name, category.id.short());
        Ok(category)
    }

    pub fn update_category(&self, id: &CategoryId, changes: CategoryChanges) -> Result<Category> {
        let _lock = self.locks.acquire(&LockKey::Categories)?;
        let mut category = self.category(id)?;

        if let Some(name) = changes.name {
            let name = require_name(name)?;
            self.ensure_name_free(&name, Some(id))?;
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = non_blank(Some(description));
        }
        category.updated_at = Utc::now();

        self.directory.save_category(&category)?;
        info!("Updated category {} ({})", category.name, category.id.short());
        Ok(category)
    }

    pub fn client(&self, id: &ClientId) -> Result<Client> {
        self.directory
            .get_client(id)?
            .ok_or_else(|| DeskError::not_found(EntityKind::Client, id))
    }

    pub fn technician(&self, id: &TechnicianId) -> Result<Technician> {
        self.directory
            .get_technician(id, false)?
            .map(|record| record.technician)
            .ok_or_else(|| DeskError::not_found(EntityKind::Technician, id))
    }

    pub fn category(&self, id: &CategoryId) -> Result<Category> {
        self.directory
            .get_category(id)?
            .ok_or_else(|| DeskError::not_found(EntityKind::Category, id))
    }

    pub fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .directory
            .list_categories()?
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim())))
    }

    pub fn clients(&self) -> Result<Vec<Client>> {
        self.directory.list_clients()
    }

    pub fn technicians(&self) -> Result<Vec<Technician>> {
        self.directory.list_technicians()
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        self.directory.list_categories()
    }

    /// Caller must hold the categories lock
    fn ensure_name_free(&self, name: &str, owner: Option<&CategoryId>) -> Result<()> {
        match self.find_category_by_name(name)? {
            Some(existing) if Some(&existing.id) != owner => Err(DeskError::InvalidInput(
                format!("Category '{name}' already exists"),
            )),
            _ => Ok(()),
        }
    }
}

fn require_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DeskError::InvalidInput("Name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
