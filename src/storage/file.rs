//! YAML file store
//!
//! Each record is one YAML document under the desk directory:
//!
//! ```text
//! .ticket-desk/
//!   state.yaml
//!   config.yaml
//!   tickets/<id>.yaml
//!   clients/<id>.yaml
//!   technicians/<id>.yaml
//!   categories/<id>.yaml
//!   locks/
//! ```
//!
//! Documents are written to a sibling `.tmp` file and renamed into place, so
//! a concurrent reader sees either the old or the new document.

use super::repository::{DirectoryRepository, IdentityDirectory, TicketRepository};
use crate::core::{
    Category, CategoryId, Client, ClientId, Technician, TechnicianId, TechnicianRecord, Ticket,
    TicketId,
};
use crate::error::{DeskError, EntityKind, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "yaml";

/// Project-level metadata stored in `state.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store backed by YAML documents on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding advisory lock files
    #[must_use]
    pub fn locks_dir(&self) -> PathBuf {
        self.base_dir.join("locks")
    }

    fn tickets_dir(&self) -> PathBuf {
        self.base_dir.join("tickets")
    }

    fn clients_dir(&self) -> PathBuf {
        self.base_dir.join("clients")
    }

    fn technicians_dir(&self) -> PathBuf {
        self.base_dir.join("technicians")
    }

    fn categories_dir(&self) -> PathBuf {
        self.base_dir.join("categories")
    }

    fn state_path(&self) -> PathBuf {
        self.base_dir.join("state.yaml")
    }

    /// Create every directory the store writes into
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            self.tickets_dir(),
            self.clients_dir(),
            self.technicians_dir(),
            self.categories_dir(),
            self.locks_dir(),
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn save_state(&self, state: &ProjectState) -> Result<()> {
        write_document(&self.state_path(), state)
    }

    pub fn load_state(&self) -> Result<ProjectState> {
        read_document(&self.state_path())?.ok_or(DeskError::ProjectNotInitialized)
    }

    pub fn save_ticket(&self, ticket: &Ticket) -> Result<()> {
        write_document(&document_path(&self.tickets_dir(), ticket.id), ticket)
    }

    pub fn load_ticket(&self, id: &TicketId) -> Result<Ticket> {
        read_document(&document_path(&self.tickets_dir(), id))?
            .ok_or_else(|| DeskError::not_found(EntityKind::Ticket, id))
    }

    pub fn load_all_tickets(&self) -> Result<Vec<Ticket>> {
        read_all_documents(&self.tickets_dir())
    }
}

fn document_path(dir: &Path, id: impl std::fmt::Display) -> PathBuf {
    dir.join(format!("{id}.{DOCUMENT_EXTENSION}"))
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(value)?;
    let tmp_path = path.with_extension(format!("{DOCUMENT_EXTENSION}.tmp"));
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_yaml::from_str(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_all_documents<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
            continue;
        }
        // Renamed away between listing and reading
        if let Some(document) = read_document(&path)? {
            documents.push(document);
        }
    }
    Ok(documents)
}

impl TicketRepository for FileStorage {
    fn save(&self, ticket: &Ticket) -> Result<()> {
        self.save_ticket(ticket)
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        self.load_ticket(id)
    }

    fn load_all(&self) -> Result<Vec<Ticket>> {
        self.load_all_tickets()
    }

    fn exists(&self, id: &TicketId) -> Result<bool> {
        Ok(document_path(&self.tickets_dir(), id).exists())
    }
}

impl IdentityDirectory for FileStorage {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>> {
        read_document(&document_path(&self.clients_dir(), id))
    }

    fn get_category(&self, id: &CategoryId) -> Result<Option<Category>> {
        read_document(&document_path(&self.categories_dir(), id))
    }

    fn get_technician(
        &self,
        id: &TechnicianId,
        include_assigned_tickets: bool,
    ) -> Result<Option<TechnicianRecord>> {
        let Some(technician) = read_document::<Technician>(&document_path(
            &self.technicians_dir(),
            id,
        ))?
        else {
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

impl DirectoryRepository for FileStorage {
    fn save_client(&self, client: &Client) -> Result<()> {
        write_document(&document_path(&self.clients_dir(), client.id), client)
    }

    fn save_technician(&self, technician: &Technician) -> Result<()> {
        write_document(
            &document_path(&self.technicians_dir(), technician.id),
            technician,
        )
    }

    fn save_category(&self, category: &Category) -> Result<()> {
        write_document(&document_path(&self.categories_dir(), category.id), category)
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        let mut clients: Vec<Client> = read_all_documents(&self.clients_dir())?;
        clients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(clients)
    }

    fn list_technicians(&self) -> Result<Vec<Technician>> {
        let mut technicians: Vec<Technician> = read_all_documents(&self.technicians_dir())?;
        technicians.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(technicians)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = read_all_documents(&self.categories_dir())?;
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(categories)
    }
}
