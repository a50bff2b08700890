pub mod audit_event;
pub mod audit_link;
pub mod audit_log;
pub mod entity_type;

pub use audit_event::*;
pub use audit_link::*;
pub use audit_log::*;
pub use entity_type::*;
