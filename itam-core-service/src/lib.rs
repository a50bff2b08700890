pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod operation;
pub mod operations;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::Item;
pub use operation::{Operation, OperationContext};
pub use operations::queries::ApprovalSummary;
pub use service::OwnershipService;
