use crate::executor::Executor;

/// Pull-in and pull-out entries; written once and never read back by the engine
pub struct RepairLogRepositoryImpl {
    pub executor: Executor,
}

impl RepairLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
