pub mod repo_impl;
pub mod create_batch;
pub mod find_by_host_computer_ids;
pub mod find_vacant;
pub mod load_batch;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::AssetRepositoryImpl;
