//! Core domain types
//!
//! Tickets, the directory records they reference, and the lifecycle status
//! chain that tickets move along.

mod builders;
mod id;
mod priority;
mod records;
mod status;
mod ticket;

pub use builders::TicketBuilder;
pub use id::{CategoryId, ClientId, TechnicianId, TicketId};
pub use priority::Priority;
pub use records::{Category, Client, Technician, TechnicianRecord};
pub use status::Status;
pub use ticket::Ticket;
