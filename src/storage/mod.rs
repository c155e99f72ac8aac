//! Persistence ports and adapters
//!
//! The lifecycle engine only sees the traits in [`repository`]; the
//! in-memory and YAML file stores implement them. [`lock`] provides the
//! keyed mutual exclusion the engine wraps around capacity checks.

mod file;
mod lock;
mod memory;
mod repository;

pub use file::{FileStorage, ProjectState};
pub use lock::{FileLockGuard, FileLocks, LockKey, LockManager, ProcessLockGuard, ProcessLocks};
pub use memory::MemoryStore;
pub use repository::{DirectoryRepository, IdentityDirectory, Store, TicketRepository};

#[cfg(test)]
pub use repository::MockIdentityDirectory;
