use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per job. Rank-changing operations on the same job run one at
/// a time; different jobs never wait on each other.
#[derive(Clone, Default)]
pub struct JobLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl JobLocks {
    pub async fn acquire(&self, job_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(job_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops the entry for a deleted job. Holders of an existing guard are unaffected.
    pub fn forget(&self, job_id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&job_id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
