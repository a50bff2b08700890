pub mod accountability;
pub mod approval;
pub mod asset;
pub mod audit;
pub mod auditable;
pub mod code_family;
pub mod component;
pub mod computer;
pub mod identifiable;
pub mod item_status;
pub mod repair_log;
pub mod return_item;
pub mod user;
pub mod versioned;

// Re-exports
pub use accountability::*;
pub use approval::*;
pub use asset::*;
pub use audit::*;
pub use auditable::*;
pub use code_family::*;
pub use component::*;
pub use computer::*;
pub use identifiable::*;
pub use item_status::*;
pub use repair_log::*;
pub use return_item::*;
pub use user::*;
pub use versioned::*;
