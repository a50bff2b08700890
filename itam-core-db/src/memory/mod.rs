//! In-memory implementation of the unit-of-work and repository traits.
//!
//! Sessions are fully serialized: a session holds the store's single lock from
//! `start_session` until commit or rollback, and works on a private copy of the
//! state that replaces the committed state only on commit.

pub mod event_sink;
pub mod repository;
pub mod state;
pub mod unit_of_work;

pub use event_sink::MemoryAuditEventSink;
pub use repository::MemoryRepository;
pub use state::{MemoryState, MemoryTable};
pub use unit_of_work::{MemorySession, MemoryUnitOfWork};
