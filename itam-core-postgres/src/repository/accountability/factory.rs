use std::sync::Arc;

use crate::executor::Executor;

use super::{
    accountability_approval_repository::AccountabilityApprovalRepositoryImpl,
    accountability_repository::AccountabilityRepositoryImpl,
    repair_log_repository::RepairLogRepositoryImpl,
    return_approval_repository::ReturnApprovalRepositoryImpl,
    return_item_repository::ReturnItemRepositoryImpl,
};

/// Factory for accountability records and the workflow rows attached to them
#[derive(Default)]
pub struct AccountabilityRepoFactory {}

impl AccountabilityRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_all_repos(&self, executor: &Executor) -> AccountabilityRepositories {
        AccountabilityRepositories {
            accountability_repository: AccountabilityRepositoryImpl::new(executor.clone()),
            return_item_repository: ReturnItemRepositoryImpl::new(executor.clone()),
            accountability_approval_repository: AccountabilityApprovalRepositoryImpl::new(
                executor.clone(),
            ),
            return_approval_repository: ReturnApprovalRepositoryImpl::new(executor.clone()),
            repair_log_repository: RepairLogRepositoryImpl::new(executor.clone()),
        }
    }
}

/// Container for the accountability repositories of one session
pub struct AccountabilityRepositories {
    pub accountability_repository: AccountabilityRepositoryImpl,
    pub return_item_repository: ReturnItemRepositoryImpl,
    pub accountability_approval_repository: AccountabilityApprovalRepositoryImpl,
    pub return_approval_repository: ReturnApprovalRepositoryImpl,
    pub repair_log_repository: RepairLogRepositoryImpl,
}
