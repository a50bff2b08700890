pub mod repo_impl;
pub mod create_batch;

pub use repo_impl::RepairLogRepositoryImpl;
