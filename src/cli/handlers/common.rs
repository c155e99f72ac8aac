//! Shared state and reference resolution for command handlers

use crate::cli::utils::find_project_root;
use crate::config::{Config, DESK_DIR};
use crate::core::{CategoryId, ClientId, TechnicianId, TicketId};
use crate::error::{DeskError, EntityKind, Result};
use crate::services::{DirectoryAdmin, TicketLifecycle};
use crate::storage::{DirectoryRepository, FileLocks, FileStorage, TicketRepository};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// How a reference that matches nothing is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// The command addresses the record itself
    NotFound,
    /// The record is referenced from another one
    InvalidReference,
}

impl Missing {
    fn error(self, kind: EntityKind, reference: &str) -> DeskError {
        match self {
            Self::NotFound => DeskError::not_found(kind, reference),
            Self::InvalidReference => DeskError::invalid_reference(kind, reference),
        }
    }
}

/// Common context for all handler operations on an initialized desk
pub struct HandlerContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub engine: TicketLifecycle<FileStorage, FileLocks>,
}

impl HandlerContext {
    pub fn new(project_dir: Option<&str>) -> Result<Self> {
        let project_root = find_project_root(project_dir)?;
        let storage = FileStorage::new(project_root.join(DESK_DIR));
        storage.load_state()?;

        let config = Config::load(Some(&project_root))?;
        let locks = FileLocks::new(storage.locks_dir(), config.lock_timeout());

        Ok(Self {
            project_root,
            config,
            engine: TicketLifecycle::new(storage, locks),
        })
    }

    pub const fn storage(&self) -> &FileStorage {
        self.engine.store()
    }

    pub const fn directory(&self) -> DirectoryAdmin<'_, FileStorage, FileLocks> {
        DirectoryAdmin::new(self.engine.store(), self.engine.locks())
    }

    /// Resolve a full ticket ID or a unique ID prefix
    pub fn resolve_ticket(&self, reference: &str) -> Result<TicketId> {
        let ids = self.storage().load_all()?.into_iter().map(|t| t.id);
        resolve_id(reference, ids, EntityKind::Ticket, Missing::NotFound)
    }

    pub fn resolve_client(&self, reference: &str, missing: Missing) -> Result<ClientId> {
        let ids = self.storage().list_clients()?.into_iter().map(|c| c.id);
        resolve_id(reference, ids, EntityKind::Client, missing)
    }

    pub fn resolve_technician(&self, reference: &str, missing: Missing) -> Result<TechnicianId> {
        let ids = self.storage().list_technicians()?.into_iter().map(|t| t.id);
        resolve_id(reference, ids, EntityKind::Technician, missing)
    }

    /// Resolve a category by ID, ID prefix or exact name
    pub fn resolve_category(&self, reference: &str, missing: Missing) -> Result<CategoryId> {
        if let Some(category) = self.directory().find_category_by_name(reference)? {
            return Ok(category.id);
        }
        let ids = self.storage().list_categories()?.into_iter().map(|c| c.id);
        resolve_id(reference, ids, EntityKind::Category, missing)
    }
}

/// Resolve `reference` against `candidates`
///
/// A well-formed UUID is returned as is, so the caller decides how an
/// unknown one is reported. Anything else must be the prefix of exactly one
/// candidate.
pub fn resolve_id<I>(
    reference: &str,
    candidates: impl IntoIterator<Item = I>,
    kind: EntityKind,
    missing: Missing,
) -> Result<I>
where
    I: Copy + Display + FromStr,
{
    let reference = reference.trim();
    if let Ok(id) = reference.parse::<I>() {
        return Ok(id);
    }

    let prefix = reference.to_lowercase();
    if prefix.is_empty() {
        return Err(DeskError::InvalidInput(format!("Empty {kind} reference")));
    }

    let matches: Vec<I> = candidates
        .into_iter()
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(missing.error(kind, reference)),
        _ => Err(DeskError::InvalidInput(format!(
            "Ambiguous {kind} reference '{reference}' matches {} records",
            matches.len()
        ))),
    }
}
