use itam_core_db::models::AccountabilityApprovalModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_approval_stamp, TryFromRow};

pub struct AccountabilityApprovalRepositoryImpl {
    pub executor: Executor,
}

impl AccountabilityApprovalRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for AccountabilityApprovalModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AccountabilityApprovalModel {
            id: row.try_get("id")?,
            accountability_id: row.try_get("accountability_id")?,
            prepared: get_approval_stamp(row, "prepared")?,
            approved: get_approval_stamp(row, "approved")?,
            confirmed: get_approval_stamp(row, "confirmed")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
