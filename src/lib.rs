//! ticket-desk - support ticket lifecycle with technician workload limits
//!
//! The crate is split into:
//! - [`core`]: tickets, directory records, identifiers and the status chain
//! - [`storage`]: repository traits with in-memory and YAML file backends,
//!   plus keyed locks
//! - [`services`]: the lifecycle engine, workload counter, queries,
//!   directory administration and demo seeding
//! - [`cli`]: the `ticket-desk` command-line front end
//!
//! # Concurrent Safety
//!
//! Status changes and assignments for one technician are serialized through
//! a per-technician lock, so no interleaving of requests can leave a
//! technician with more than
//! [`MAX_IN_PROGRESS_PER_TECHNICIAN`](services::MAX_IN_PROGRESS_PER_TECHNICIAN)
//! tickets in progress. The file backend uses advisory lock files, which
//! extends the guarantee across processes sharing a desk directory.
//!
//! # Example
//!
//! ```rust
//! use ticket_desk::core::{Category, Client, Priority, Status};
//! use ticket_desk::services::{NewTicket, TicketLifecycle};
//! use ticket_desk::storage::{DirectoryRepository, MemoryStore, ProcessLocks};
//!
//! # fn main() -> ticket_desk::Result<()> {
//! let store = MemoryStore::new();
//! let client = Client::new("Acme");
//! let category = Category::new("Request");
//! store.save_client(&client)?;
//! store.save_category(&category)?;
//!
//! let desk = TicketLifecycle::new(store, ProcessLocks::new());
//! let ticket = desk.create(NewTicket {
//!     title: "Printer jam".to_string(),
//!     description: "Tray 2 is stuck".to_string(),
//!     priority: Priority::Medium,
//!     category_id: category.id,
//!     client_id: client.id,
//!     technician_id: None,
//! })?;
//!
//! let ticket = desk.transition_status(&ticket.id, Status::InProgress)?;
//! assert_eq!(ticket.status, Status::InProgress);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub use error::{DeskError, Result};
