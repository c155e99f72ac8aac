//! Domain services built on the storage ports

pub mod directory;
pub mod lifecycle;
pub mod query;
pub mod seed;
pub mod workload;

pub use directory::{
    CategoryChanges, ClientChanges, DirectoryAdmin, NewCategory, NewClient, NewTechnician,
    TechnicianChanges,
};
pub use lifecycle::{NewTicket, TicketChanges, TicketLifecycle};
pub use query::TicketQueries;
pub use seed::{SeedReport, seed_directory};
pub use workload::{MAX_IN_PROGRESS_PER_TECHNICIAN, WorkloadCounter, WorkloadSummary};
