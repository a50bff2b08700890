use crate::executor::Executor;

/// Counters in `code_counter`, one row per code family
///
/// Incrementing the row holds its lock until the session ends, so concurrent
/// operations drawing from the same family queue behind each other.
pub struct CodeSequenceRepositoryImpl {
    pub executor: Executor,
}

impl CodeSequenceRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}
