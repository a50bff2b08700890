use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::versioned::Versioned;

/// Everything one owner currently holds, under an accountability and tracking code pair
///
/// A record is live while `is_deleted` is false; at most one live record exists per owner.
/// `is_active` is turned off by a return and turned back on by the next assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountabilityModel {
    pub id: Uuid,
    /// `ACID-0001`; immutable once assigned
    pub accountability_code: HeaplessString<20>,
    /// `TRID-0001`; immutable once assigned
    pub tracking_code: HeaplessString<20>,
    pub owner_id: Uuid,
    pub asset_ids: Vec<Uuid>,
    pub computer_ids: Vec<Uuid>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,

    /// Hash of the entity with hash field set to 0
    pub hash: i64,
    /// Audit log of the last create/update
    pub audit_log_id: Option<Uuid>,
}

impl AccountabilityModel {
    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }

    pub fn contains(&self, item_id: Uuid) -> bool {
        self.asset_ids.contains(&item_id) || self.computer_ids.contains(&item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.asset_ids.is_empty() && self.computer_ids.is_empty()
    }

    pub fn add_asset(&mut self, asset_id: Uuid) {
        if !self.asset_ids.contains(&asset_id) {
            self.asset_ids.push(asset_id);
        }
    }

    pub fn add_computer(&mut self, computer_id: Uuid) {
        if !self.computer_ids.contains(&computer_id) {
            self.computer_ids.push(computer_id);
        }
    }

    /// Drops the item from whichever id set holds it; returns false if it was not a member
    pub fn remove_member(&mut self, item_id: Uuid) -> bool {
        let before = self.asset_ids.len() + self.computer_ids.len();
        self.asset_ids.retain(|id| *id != item_id);
        self.computer_ids.retain(|id| *id != item_id);
        before != self.asset_ids.len() + self.computer_ids.len()
    }

    /// Marks the record deleted and clears its membership
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.is_active = false;
        self.asset_ids.clear();
        self.computer_ids.clear();
    }
}

impl Identifiable for AccountabilityModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for AccountabilityModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for AccountabilityModel {
    const ENTITY_TYPE: EntityType = EntityType::Accountability;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_a_set() {
        let mut record = AccountabilityModel {
            id: Uuid::new_v4(),
            accountability_code: HeaplessString::try_from("ACID-0001").unwrap(),
            tracking_code: HeaplessString::try_from("TRID-0001").unwrap(),
            owner_id: Uuid::new_v4(),
            asset_ids: Vec::new(),
            computer_ids: Vec::new(),
            is_active: true,
            is_deleted: false,
            date_created: Utc::now(),
            hash: 0,
            audit_log_id: None,
        };
        let asset_id = Uuid::new_v4();
        record.add_asset(asset_id);
        record.add_asset(asset_id);
        assert_eq!(record.asset_ids.len(), 1);
        assert!(record.contains(asset_id));

        assert!(record.remove_member(asset_id));
        assert!(record.is_empty());

        record.add_computer(Uuid::new_v4());
        record.soft_delete();
        assert!(!record.is_live());
        assert!(record.is_empty());
    }
}
