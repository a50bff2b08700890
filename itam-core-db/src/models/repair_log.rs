use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use itam_core_api::ItemKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::versioned::Versioned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "repair_action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairAction {
    PullIn,
    PullOut,
}

impl std::fmt::Display for RepairAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairAction::PullIn => write!(f, "Pull in"),
            RepairAction::PullOut => write!(f, "Pull out"),
        }
    }
}

/// Maintenance trail entry written with every pull-in and pull-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairLogModel {
    pub id: Uuid,
    pub item_kind: ItemKind,
    /// Barcode of an asset or uid of a component
    pub inventory_code: HeaplessString<50>,
    pub item_id: Uuid,
    pub computer_id: Uuid,
    pub action: RepairAction,
    pub remarks: Option<HeaplessString<500>>,
    pub performed_by: Uuid,
    pub performed_at: DateTime<Utc>,

    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for RepairLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for RepairLogModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for RepairLogModel {
    const ENTITY_TYPE: EntityType = EntityType::RepairLog;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
