//! Building blocks shared by the engine operations: the working copy of the
//! ownership graph, code issuance, history trails and the cascades that keep
//! owners, hosts and accountability records consistent.

pub mod changeset;
pub mod codes;
pub mod graph;
pub mod history;
pub mod item;
pub mod text;

pub use changeset::{ChangeSet, SessionTable};
pub use codes::next_code;
pub use history::{clear_owner, record_history, record_root_history, OwnedItem};
pub use item::{entity_type_of, Item};
