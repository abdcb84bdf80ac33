//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-project write locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use collab_core::ports::RecordStore;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<Config>,
    pub project_locks: ProjectLocks,
}

//=========================================================================================
// ProjectLocks (One Exclusive Writer Per Project)
//=========================================================================================

/// Hands out one async mutex per project id so every mutation of a project
/// record (tasks, membership, edits) runs as an exclusive read-modify-write
/// section. Two sessions moving tasks on the same board therefore cannot
/// silently overwrite each other.
#[derive(Clone, Default)]
pub struct ProjectLocks {
    locks: Arc<StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `project_id`, creating it on first use. The
    /// returned handle must be `.lock().await`-ed around the whole
    /// load-mutate-store cycle.
    pub fn lock_for(&self, project_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("project lock map poisoned");
        locks
            .entry(project_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the lock entry for a deleted project.
    pub fn forget(&self, project_id: Uuid) {
        let mut locks = self.locks.lock().expect("project lock map poisoned");
        locks.remove(&project_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_project_gets_the_same_lock() {
        let locks = ProjectLocks::new();
        let id = Uuid::new_v4();

        let a = locks.lock_for(id);
        let b = locks.lock_for(id);
        assert!(Arc::ptr_eq(&a, &b));

        let other = locks.lock_for(Uuid::new_v4());
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn lock_serializes_writers() {
        let locks = ProjectLocks::new();
        let id = Uuid::new_v4();

        let handle = locks.lock_for(id);
        let guard = handle.lock().await;

        // A second writer must not be able to enter while the first holds it.
        assert!(locks.lock_for(id).try_lock().is_err());
        drop(guard);
        assert!(locks.lock_for(id).try_lock().is_ok());
    }
}
