use async_trait::async_trait;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::repository::MemoryRepository;
use super::state::MemoryState;
use crate::error::ConcurrentUpdateError;
use crate::unit_of_work::{UnitOfWork, UnitOfWorkSession};

/// Unit of work over a process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryUnitOfWork {
    committed: Arc<Mutex<MemoryState>>,
    failing_commits: Arc<AtomicUsize>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MemoryState) -> Self {
        Self {
            committed: Arc::new(Mutex::new(state)),
            failing_commits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Copy of the committed state; waits for any open session to finish
    pub async fn snapshot(&self) -> MemoryState {
        (*self.committed.lock().await).clone()
    }

    /// Makes the next `count` commits fail with a concurrency conflict
    pub fn fail_next_commits(&self, count: usize) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    type Session = MemorySession;

    async fn start_session(&self) -> Result<MemorySession, Box<dyn Error + Send + Sync>> {
        let guard = self.committed.clone().lock_owned().await;
        let repository = MemoryRepository::new((*guard).clone());
        Ok(MemorySession {
            guard,
            repository,
            failing_commits: self.failing_commits.clone(),
        })
    }
}

pub struct MemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    repository: MemoryRepository,
    failing_commits: Arc<AtomicUsize>,
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
    type Users = MemoryRepository;
    type Assets = MemoryRepository;
    type Computers = MemoryRepository;
    type Components = MemoryRepository;
    type Accountabilities = MemoryRepository;
    type ReturnItems = MemoryRepository;
    type AccountabilityApprovals = MemoryRepository;
    type ReturnApprovals = MemoryRepository;
    type RepairLogs = MemoryRepository;
    type Codes = MemoryRepository;
    type Audit = MemoryRepository;

    fn users(&self) -> &MemoryRepository {
        &self.repository
    }

    fn assets(&self) -> &MemoryRepository {
        &self.repository
    }

    fn computers(&self) -> &MemoryRepository {
        &self.repository
    }

    fn components(&self) -> &MemoryRepository {
        &self.repository
    }

    fn accountabilities(&self) -> &MemoryRepository {
        &self.repository
    }

    fn return_items(&self) -> &MemoryRepository {
        &self.repository
    }

    fn accountability_approvals(&self) -> &MemoryRepository {
        &self.repository
    }

    fn return_approvals(&self) -> &MemoryRepository {
        &self.repository
    }

    fn repair_logs(&self) -> &MemoryRepository {
        &self.repository
    }

    fn codes(&self) -> &MemoryRepository {
        &self.repository
    }

    fn audit(&self) -> &MemoryRepository {
        &self.repository
    }

    async fn commit(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let MemorySession {
            mut guard,
            repository,
            failing_commits,
        } = self;
        let injected = failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(Box::new(ConcurrentUpdateError::LockNotAcquired(
                "commit rejected".to_string(),
            )));
        }
        let working = (*repository.state.lock()).clone();
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
