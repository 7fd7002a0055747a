//! Per-branch serialization of deliveries
//!
//! Duplicate deliveries for the same branch can race between lookup and
//! create. Holding a lock per (repository, branch) for the duration of a
//! reconciliation closes that window inside one process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

type Key = (String, String);
type Table = Arc<Mutex<HashMap<Key, Arc<tokio::sync::Mutex<()>>>>>;

/// Lock table keyed by (repository full name, branch)
#[derive(Debug, Default)]
pub struct BranchLocks {
    inner: Table,
}

/// Held while a branch is being reconciled; releases and prunes on drop
pub struct BranchGuard {
    // Fields drop in order: the mutex is released before the entry is checked
    _guard: OwnedMutexGuard<()>,
    _entry: Entry,
}

/// Interest in a table entry, from the first wait until release
///
/// Dropping the last one removes the entry, whether its holder got the lock or
/// was cancelled while waiting.
struct Entry {
    key: Key,
    table: Table,
    lock: Option<Arc<tokio::sync::Mutex<()>>>,
}

impl BranchLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a branch
    pub async fn acquire(&self, repository: &str, branch: &str) -> BranchGuard {
        let key = (repository.to_string(), branch.to_string());
        let (entry, lock) = {
            let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let lock = Arc::clone(table.entry(key.clone()).or_default());
            let entry = Entry {
                key,
                table: Arc::clone(&self.inner),
                lock: Some(Arc::clone(&lock)),
            };
            (entry, lock)
        };

        let guard = lock.lock_owned().await;
        BranchGuard {
            _guard: guard,
            _entry: entry,
        }
    }

    /// Number of branches with a live lock entry
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no branch currently holds or awaits a lock
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for Entry {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Released under the table lock so concurrent drops see each other
        drop(self.lock.take());
        // Only the table itself still references an idle lock
        if table
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(&self.key);
        }
    }
}
