use heapless::String as HeaplessString;
use itam_core_api::ComponentType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::item_status::ItemStatus;
use crate::models::versioned::Versioned;

/// An internal part installed in at most one computer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentModel {
    pub id: Uuid,
    /// Sequential human-readable identifier (`UID-001`)
    pub uid: HeaplessString<20>,
    pub component_type: ComponentType,
    pub description: HeaplessString<200>,
    pub cost: Option<Decimal>,
    pub status: ItemStatus,

    /// Mirrors the host computer's owner while installed
    pub owner_id: Option<Uuid>,
    pub host_computer_id: Option<Uuid>,
    /// Barcode of the host computer while installed
    pub asset_barcode: Option<HeaplessString<50>>,
    /// Host computers this component was installed in, oldest first; append-only
    pub history: Vec<Uuid>,
    pub is_deleted: bool,

    /// Hash of the entity with hash field set to 0
    pub hash: i64,
    /// Audit log of the last create/update
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for ComponentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ComponentModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for ComponentModel {
    const ENTITY_TYPE: EntityType = EntityType::Component;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
