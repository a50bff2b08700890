pub mod repo_impl;
pub mod next_value;

pub use repo_impl::CodeSequenceRepositoryImpl;
