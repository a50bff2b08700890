use chrono::NaiveDate;
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

/// One installed part of a computer; a computer has at most one slot per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSlot {
    pub component_type: ComponentType,
    pub component_id: Uuid,
}

/// A host machine carrying peripheral assets and internal components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputerModel {
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

    pub owner_id: Option<Uuid>,
    /// Peripheral assets currently attached, in attach order, no duplicates
    pub assigned_assets: Vec<Uuid>,
    /// Installed components, ordered by component type
    pub components: Vec<ComponentSlot>,
    /// Former owners, oldest first; append-only
    pub history: Vec<Uuid>,
    pub is_deleted: bool,

    /// Hash of the entity with hash field set to 0
    pub hash: i64,
    /// Audit log of the last create/update
    pub audit_log_id: Option<Uuid>,
}

impl ComputerModel {
    pub fn is_vacant(&self) -> bool {
        self.owner_id.is_none()
    }

    /// Adds a peripheral; returns false if it was already attached
    pub fn attach_asset(&mut self, asset_id: Uuid) -> bool {
        if self.assigned_assets.contains(&asset_id) {
            return false;
        }
        self.assigned_assets.push(asset_id);
        true
    }

    /// Removes a peripheral; returns false if it was not attached
    pub fn detach_asset(&mut self, asset_id: Uuid) -> bool {
        let before = self.assigned_assets.len();
        self.assigned_assets.retain(|id| *id != asset_id);
        before != self.assigned_assets.len()
    }

    pub fn slot(&self, component_type: ComponentType) -> Option<Uuid> {
        self.components
            .iter()
            .find(|slot| slot.component_type == component_type)
            .map(|slot| slot.component_id)
    }

    /// Installs a component, replacing whatever occupied the slot
    pub fn set_slot(&mut self, component_type: ComponentType, component_id: Uuid) {
        self.components
            .retain(|slot| slot.component_type != component_type);
        self.components.push(ComponentSlot {
            component_type,
            component_id,
        });
        self.components.sort_by_key(|slot| slot.component_type);
    }

    /// Clears the slot holding the component; returns false if it was not installed
    pub fn clear_slot_of(&mut self, component_id: Uuid) -> bool {
        let before = self.components.len();
        self.components.retain(|slot| slot.component_id != component_id);
        before != self.components.len()
    }
}

impl Identifiable for ComputerModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ComputerModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for ComputerModel {
    const ENTITY_TYPE: EntityType = EntityType::Computer;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
