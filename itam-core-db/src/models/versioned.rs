use serde::Serialize;
use uuid::Uuid;

use super::audit::EntityType;
use super::auditable::Auditable;

/// Trait for entities whose rows carry a content hash and the id of the audit log that wrote them
///
/// The hash is computed over the entity with `hash` set to 0 and is used as the
/// optimistic version: an update only applies when the stored hash still matches
/// the hash the caller loaded.
pub trait Versioned: Auditable + Serialize + Clone + Send + Sync {
    /// Entity type recorded in audit links and events
    const ENTITY_TYPE: EntityType;

    fn get_hash(&self) -> i64;

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>);
}
