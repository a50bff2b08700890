pub mod error;
pub mod models;
pub mod repository;
pub mod unit_of_work;
pub mod utils;

#[cfg(feature = "memory")]
pub mod memory;

pub use error::*;
pub use models::*;
pub use unit_of_work::*;
