pub mod accountability_approval_repository;
pub mod accountability_repository;
pub mod factory;
pub mod repair_log_repository;
pub mod return_approval_repository;
pub mod return_item_repository;

pub use factory::{AccountabilityRepoFactory, AccountabilityRepositories};
