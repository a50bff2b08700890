use itam_core_db::models::ReturnApprovalModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_approval_stamp, TryFromRow};

pub struct ReturnApprovalRepositoryImpl {
    pub executor: Executor,
}

impl ReturnApprovalRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ReturnApprovalModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ReturnApprovalModel {
            id: row.try_get("id")?,
            accountability_id: row.try_get("accountability_id")?,
            checked: get_approval_stamp(row, "checked")?,
            received: get_approval_stamp(row, "received")?,
            confirmed: get_approval_stamp(row, "confirmed")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
