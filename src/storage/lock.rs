//! Keyed mutual exclusion
//!
//! The lifecycle engine reads a technician's workload, compares it to the
//! cap, and then writes. Those three steps run while holding the lock for
//! the technician (and, for edits of an existing ticket, the lock for that
//! ticket first). Directory writes lock the record they change; category
//! writes share one key so the unique-name check and the save stay together.
//! A seeding run holds [`LockKey::Seed`] before any other key.
//!
//! Two managers are provided:
//!
//! - [`ProcessLocks`] serializes threads of one process.
//! - [`FileLocks`] serializes every process sharing a desk directory through
//!   advisory lock files.

use crate::core::{ClientId, TechnicianId, TicketId};
use crate::error::{DeskError, Result};
use fs2::FileExt;
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Resource guarded by a lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    Ticket(TicketId),
    Technician(TechnicianId),
    Client(ClientId),
    /// Every category record, so that names stay unique
    Categories,
    /// A whole seeding run
    Seed,
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticket(id) => write!(f, "ticket-{id}"),
            Self::Technician(id) => write!(f, "technician-{id}"),
            Self::Client(id) => write!(f, "client-{id}"),
            Self::Categories => f.write_str("categories"),
            Self::Seed => f.write_str("seed"),
        }
    }
}

/// Source of exclusive, keyed locks
///
/// The lock is held until the returned guard is dropped.
pub trait LockManager: Send + Sync {
    type Guard<'a>
    where
        Self: 'a;

    fn acquire(&self, key: &LockKey) -> Result<Self::Guard<'_>>;
}

/// In-process keyed locks
#[derive(Debug, Default)]
pub struct ProcessLocks {
    held: Mutex<HashSet<LockKey>>,
    released: Condvar,
}

impl ProcessLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DeskError {
    DeskError::LockPoisoned("process locks".to_string())
}

/// Guard returned by [`ProcessLocks`]
#[derive(Debug)]
pub struct ProcessLockGuard<'a> {
    locks: &'a ProcessLocks,
    key: LockKey,
}

impl Drop for ProcessLockGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.key);
        drop(held);
        self.locks.released.notify_all();
    }
}

impl LockManager for ProcessLocks {
    type Guard<'a>
        = ProcessLockGuard<'a>
    where
        Self: 'a;

    fn acquire(&self, key: &LockKey) -> Result<Self::Guard<'_>> {
        let mut held = self.held.lock().map_err(poisoned)?;
        while held.contains(key) {
            held = self.released.wait(held).map_err(poisoned)?;
        }
        held.insert(*key);
        debug!("Acquired process lock {key}");
        Ok(ProcessLockGuard {
            locks: self,
            key: *key,
        })
    }
}

/// Advisory lock files shared by every process using the same directory
#[derive(Debug, Clone)]
pub struct FileLocks {
    dir: PathBuf,
    timeout: Duration,
}

impl FileLocks {
    pub fn new(dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            dir: dir.into(),
            timeout,
        }
    }

    fn lock_path(&self, key: &LockKey) -> PathBuf {
        self.dir.join(format!("{key}.lock"))
    }
}

/// Guard returned by [`FileLocks`]; unlocks the file on drop
#[derive(Debug)]
pub struct FileLockGuard {
    file: File,
    path: PathBuf,
}

impl FileLockGuard {
    fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            if file.try_lock_exclusive().is_ok() {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            if start.elapsed() >= timeout {
                return Err(DeskError::LockTimeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl LockManager for FileLocks {
    type Guard<'a>
        = FileLockGuard
    where
        Self: 'a;

    fn acquire(&self, key: &LockKey) -> Result<Self::Guard<'_>> {
        let guard = FileLockGuard::acquire(&self.lock_path(key), self.timeout)?;
        debug!("Acquired file lock {}", guard.path().display());
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[test]
    fn test_process_lock_excludes_same_key() {
        let locks = Arc::new(ProcessLocks::new());
        let key = LockKey::Technician(TechnicianId::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    let _guard = locks.acquire(&key).unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_process_lock_distinct_keys_do_not_block() {
        let locks = ProcessLocks::new();
        let _first = locks.acquire(&LockKey::Ticket(TicketId::new())).unwrap();
        let _second = locks
            .acquire(&LockKey::Technician(TechnicianId::new()))
            .unwrap();
    }

    #[test]
    fn test_lock_file_names() {
        assert_eq!(LockKey::Categories.to_string(), "categories");
        assert_eq!(LockKey::Seed.to_string(), "seed");
        let id = ClientId::new();
        assert_eq!(LockKey::Client(id).to_string(), format!("client-{id}"));
    }

    #[test]
    fn test_process_lock_released_on_drop() {
        let locks = ProcessLocks::new();
        let key = LockKey::Ticket(TicketId::new());
        drop(locks.acquire(&key).unwrap());
        let _again = locks.acquire(&key).unwrap();
    }

    #[test]
    fn test_file_lock_times_out_while_held() {
        let temp_dir = TempDir::new().unwrap();
        let locks = FileLocks::new(temp_dir.path().join("locks"), Duration::from_millis(50));
        let key = LockKey::Technician(TechnicianId::new());

        let guard = locks.acquire(&key).unwrap();
        assert!(guard.path().ends_with(format!("{key}.lock")));

        let err = locks.acquire(&key).unwrap_err();
        assert!(matches!(err, DeskError::LockTimeout { .. }));

        drop(guard);
        assert!(locks.acquire(&key).is_ok());
    }
}
