use chrono::NaiveDate;
use heapless::String as HeaplessString;
use itam_core_api::ItemKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::versioned::Versioned;

/// One item handed back under an accountability record; append-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnItemModel {
    pub id: Uuid,
    pub accountability_id: Uuid,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub remarks: Option<HeaplessString<500>>,
    pub returned_by: Uuid,
    pub return_date: NaiveDate,

    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for ReturnItemModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ReturnItemModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for ReturnItemModel {
    const ENTITY_TYPE: EntityType = EntityType::ReturnItem;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
