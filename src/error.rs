//! Error types for ticket-desk
//!
//! Every fallible operation in the crate returns [`Result`]. The four domain
//! failures of the lifecycle engine (`NotFound`, `InvalidReference`,
//! `InvalidTransition`, `CapacityExceeded`) carry enough context for the
//! caller to render a precise message; the remaining variants cover storage,
//! configuration and input problems.

use crate::core::{Status, TechnicianId};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeskError>;

/// Kind of record an identifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ticket,
    Client,
    Technician,
    Category,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ticket => "ticket",
            Self::Client => "client",
            Self::Technician => "technician",
            Self::Category => "category",
        };
        f.write_str(name)
    }
}

/// Main error type for ticket-desk
#[derive(Debug, Error)]
pub enum DeskError {
    /// The addressed record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A foreign id supplied with a request does not resolve
    #[error("Invalid {kind}: {id} does not exist")]
    InvalidReference { kind: EntityKind, id: String },

    /// The requested status is not the successor of the current one
    #[error("Transition not allowed from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    /// The technician already holds the maximum number of in-progress tickets
    #[error(
        "Technician {technician_id} already has {in_progress} tickets in progress (limit {limit})"
    )]
    CapacityExceeded {
        technician_id: TechnicianId,
        in_progress: usize,
        limit: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Project not initialized. Run 'ticket-desk init' first")]
    ProjectNotInitialized,

    #[error("Project already initialized at {}", .0.display())]
    ProjectAlreadyInitialized(PathBuf),

    #[error("Lock timed out after {waited:?} at {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    #[error("Internal lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Custom(String),
}

impl DeskError {
    /// Create a custom error from any displayable message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_reference(kind: EntityKind, id: impl ToString) -> Self {
        Self::InvalidReference {
            kind,
            id: id.to_string(),
        }
    }

    /// HTTP-style status code for the failure
    ///
    /// Missing tickets map to 404, every rejected request to 400 and
    /// infrastructure failures to 500.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidReference { .. }
            | Self::InvalidTransition { .. }
            | Self::CapacityExceeded { .. }
            | Self::InvalidInput(_) => 400,
            _ => 500,
        }
    }

    /// Message shown to users on the terminal
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File operation failed: {e}"),
            Self::Yaml(e) => format!("Stored data could not be read: {e}"),
            _ => self.to_string(),
        }
    }

    /// Hints for fixing the error, if any apply
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectNotInitialized => vec![
                "Run 'ticket-desk init' to create a desk in this directory".to_string(),
                "Or pass --project to point at an existing desk".to_string(),
            ],
            Self::ProjectAlreadyInitialized(_) => {
                vec!["Use 'ticket-desk init --force' to reinitialize".to_string()]
            },
            Self::InvalidTransition { from, .. } => match from.next() {
                Some(next) => vec![format!("The only allowed next status is '{next}'")],
                None => vec![format!("Tickets in '{from}' cannot change status")],
            },
            Self::CapacityExceeded { .. } => vec![
                "Resolve one of the technician's in-progress tickets first".to_string(),
                "Or assign the ticket to another technician".to_string(),
            ],
            Self::InvalidReference { kind, .. } | Self::NotFound { kind, .. } => {
                vec![format!("List existing records with 'ticket-desk {kind} list'")]
            },
            Self::LockTimeout { .. } => {
                vec!["Another ticket-desk process is holding the lock; retry shortly".to_string()]
            },
            _ => vec![],
        }
    }

    /// Whether retrying the same request later may succeed
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LockTimeout { .. } | Self::CapacityExceeded { .. } | Self::Io(_)
        )
    }

    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::ProjectNotInitialized | Self::ProjectAlreadyInitialized(_)
        )
    }
}
