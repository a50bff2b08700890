use std::sync::Arc;

use crate::executor::Executor;

use super::{
    asset_repository::AssetRepositoryImpl, component_repository::ComponentRepositoryImpl,
    computer_repository::ComputerRepositoryImpl, user_repository::UserRepositoryImpl,
};

/// Factory for the user and item repositories
///
/// Holds no caches; every build binds fresh repositories to the session's executor.
#[derive(Default)]
pub struct InventoryRepoFactory {}

impl InventoryRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_all_repos(&self, executor: &Executor) -> InventoryRepositories {
        InventoryRepositories {
            user_repository: UserRepositoryImpl::new(executor.clone()),
            asset_repository: AssetRepositoryImpl::new(executor.clone()),
            computer_repository: ComputerRepositoryImpl::new(executor.clone()),
            component_repository: ComponentRepositoryImpl::new(executor.clone()),
        }
    }
}

/// Container for the inventory repositories of one session
pub struct InventoryRepositories {
    pub user_repository: UserRepositoryImpl,
    pub asset_repository: AssetRepositoryImpl,
    pub computer_repository: ComputerRepositoryImpl,
    pub component_repository: ComponentRepositoryImpl,
}
