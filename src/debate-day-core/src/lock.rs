//! Per-debate mutual exclusion.
//!
//! Every mutating coordinator operation on a debate id runs inside that
//! id's critical section; distinct debates never contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Maps each debate id to a single-permit semaphore.
#[derive(Default)]
pub struct DebateLockMap {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl DebateLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the write lock for a debate, waiting if another mutation
    /// is in flight. The permit releases on drop.
    pub async fn acquire(&self, debate_id: &str) -> OwnedSemaphorePermit {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(debate_id.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };
        // The semaphore is never closed, so this cannot fail.
        sem.acquire_owned().await.expect("debate lock semaphore closed")
    }

    /// Number of tracked debates.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
