pub mod repo_impl;
pub mod create_links;
pub mod create_log;
pub mod find_links_by_audit_log_id;

pub use repo_impl::AuditRepositoryImpl;
