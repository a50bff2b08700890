pub mod repo_impl;
pub mod create_batch;
pub mod find_live_by_member_ids;
pub mod find_live_by_owner_id;
pub mod load_batch;
pub mod members;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::AccountabilityRepositoryImpl;
