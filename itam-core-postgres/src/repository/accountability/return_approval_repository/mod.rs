pub mod repo_impl;
pub mod create_batch;
pub mod find_by_accountability_id;
pub mod lock_batch;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::ReturnApprovalRepositoryImpl;
