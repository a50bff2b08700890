use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::versioned::Versioned;

/// An employee who can be held accountable for equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    /// Natural key used by bulk onboarding to find-or-create the owner
    pub employee_id: HeaplessString<50>,
    pub name: HeaplessString<100>,
    pub company: HeaplessString<100>,
    pub department: HeaplessString<100>,
    pub designation: Option<HeaplessString<100>>,

    /// Hash of the entity with hash field set to 0
    pub hash: i64,
    /// Audit log of the last create/update
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for UserModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for UserModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for UserModel {
    const ENTITY_TYPE: EntityType = EntityType::User;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
