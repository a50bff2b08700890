pub mod domain;
pub mod error;
pub mod validation;

pub use domain::*;
pub use error::*;
