use chrono::NaiveDate;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::item_status::ItemStatus;
use crate::models::versioned::Versioned;

/// A standalone tracked item, optionally plugged into a host computer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetModel {
    pub id: Uuid,
    pub asset_type: HeaplessString<50>,
    pub asset_barcode: HeaplessString<50>,
    pub brand: Option<HeaplessString<50>>,
    pub model: Option<HeaplessString<100>>,
    pub serial_no: Option<HeaplessString<100>>,
    pub cost: Option<Decimal>,
    pub date_acquired: Option<NaiveDate>,
    pub remarks: Option<HeaplessString<500>>,
    pub status: ItemStatus,

    /// Current owner; None while vacant
    pub owner_id: Option<Uuid>,
    /// Computer this asset is attached to as a peripheral
    pub host_computer_id: Option<Uuid>,
    /// Former owners and hosts, oldest first; append-only
    pub history: Vec<Uuid>,
    /// Every host computer this asset was ever linked to; append-only, no duplicates
    pub root_history: Vec<Uuid>,
    pub is_deleted: bool,

    /// Hash of the entity with hash field set to 0
    pub hash: i64,
    /// Audit log of the last create/update
    pub audit_log_id: Option<Uuid>,
}

impl AssetModel {
    pub fn is_vacant(&self) -> bool {
        self.owner_id.is_none()
    }
}

impl Identifiable for AssetModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for AssetModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for AssetModel {
    const ENTITY_TYPE: EntityType = EntityType::Asset;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
