pub mod asset_repository;
pub mod component_repository;
pub mod computer_repository;
pub mod factory;
pub mod user_repository;

pub use factory::{InventoryRepoFactory, InventoryRepositories};
