pub mod audit_event_sink;
pub mod audit_repository;
pub mod code_sequence;
pub mod create_batch;
pub mod find_by_accountability_id;
pub mod find_by_assigned_asset;
pub mod find_by_employee_id;
pub mod find_by_host_computer_ids;
pub mod find_live_by_member_ids;
pub mod find_live_by_owner_id;
pub mod find_vacant;
pub mod load_batch;
pub mod lock_batch;
pub mod pagination;
pub mod update_batch;

// Re-exports
pub use audit_event_sink::*;
pub use audit_repository::*;
pub use code_sequence::*;
pub use create_batch::*;
pub use find_by_accountability_id::*;
pub use find_by_assigned_asset::*;
pub use find_by_employee_id::*;
pub use find_by_host_computer_ids::*;
pub use find_live_by_member_ids::*;
pub use find_live_by_owner_id::*;
pub use find_vacant::*;
pub use load_batch::*;
pub use lock_batch::*;
pub use pagination::*;
pub use update_batch::*;
