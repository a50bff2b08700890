pub mod approval;
pub mod component_type;
pub mod refs;
pub mod requests;

pub use approval::*;
pub use component_type::*;
pub use refs::*;
pub use requests::*;
