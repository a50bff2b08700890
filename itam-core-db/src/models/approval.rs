use chrono::NaiveDate;
use itam_core_api::{AccountabilityStage, ReturnStage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::EntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::versioned::Versioned;

/// Who signed a stage and on which day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStamp {
    pub user_id: Uuid,
    pub date: NaiveDate,
}

/// Sign-off sequence of an accountability record: prepared, approved, confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountabilityApprovalModel {
    pub id: Uuid,
    pub accountability_id: Uuid,
    pub prepared: Option<ApprovalStamp>,
    pub approved: Option<ApprovalStamp>,
    pub confirmed: Option<ApprovalStamp>,

    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl AccountabilityApprovalModel {
    pub fn stamp(&self, stage: AccountabilityStage) -> Option<&ApprovalStamp> {
        match stage {
            AccountabilityStage::Prepared => self.prepared.as_ref(),
            AccountabilityStage::Approved => self.approved.as_ref(),
            AccountabilityStage::Confirmed => self.confirmed.as_ref(),
        }
    }

    pub fn set_stamp(&mut self, stage: AccountabilityStage, stamp: ApprovalStamp) {
        match stage {
            AccountabilityStage::Prepared => self.prepared = Some(stamp),
            AccountabilityStage::Approved => self.approved = Some(stamp),
            AccountabilityStage::Confirmed => self.confirmed = Some(stamp),
        }
    }
}

/// Sign-off sequence of a return: checked, received, confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnApprovalModel {
    pub id: Uuid,
    pub accountability_id: Uuid,
    pub checked: Option<ApprovalStamp>,
    pub received: Option<ApprovalStamp>,
    pub confirmed: Option<ApprovalStamp>,

    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl ReturnApprovalModel {
    pub fn stamp(&self, stage: ReturnStage) -> Option<&ApprovalStamp> {
        match stage {
            ReturnStage::Checked => self.checked.as_ref(),
            ReturnStage::Received => self.received.as_ref(),
            ReturnStage::Confirmed => self.confirmed.as_ref(),
        }
    }

    pub fn set_stamp(&mut self, stage: ReturnStage, stamp: ApprovalStamp) {
        match stage {
            ReturnStage::Checked => self.checked = Some(stamp),
            ReturnStage::Received => self.received = Some(stamp),
            ReturnStage::Confirmed => self.confirmed = Some(stamp),
        }
    }
}

/// Either approval sequence, as returned to callers advancing a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "workflow", rename_all = "snake_case")]
pub enum ApprovalRecord {
    Accountability(AccountabilityApprovalModel),
    Return(ReturnApprovalModel),
}

impl Identifiable for AccountabilityApprovalModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for AccountabilityApprovalModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for AccountabilityApprovalModel {
    const ENTITY_TYPE: EntityType = EntityType::AccountabilityApproval;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}

impl Identifiable for ReturnApprovalModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ReturnApprovalModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl Versioned for ReturnApprovalModel {
    const ENTITY_TYPE: EntityType = EntityType::ReturnApproval;

    fn get_hash(&self) -> i64 {
        self.hash
    }

    fn set_version(&mut self, hash: i64, audit_log_id: Option<Uuid>) {
        self.hash = hash;
        self.audit_log_id = audit_log_id;
    }
}
