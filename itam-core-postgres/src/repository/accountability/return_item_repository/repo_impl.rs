use itam_core_db::models::ReturnItemModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_optional_heapless_string, TryFromRow};

/// Return lines are append-only
pub struct ReturnItemRepositoryImpl {
    pub executor: Executor,
}

impl ReturnItemRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ReturnItemModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ReturnItemModel {
            id: row.try_get("id")?,
            accountability_id: row.try_get("accountability_id")?,
            item_kind: row.try_get("item_kind")?,
            item_id: row.try_get("item_id")?,
            remarks: get_optional_heapless_string(row, "remarks")?,
            returned_by: row.try_get("returned_by")?,
            return_date: row.try_get("return_date")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
