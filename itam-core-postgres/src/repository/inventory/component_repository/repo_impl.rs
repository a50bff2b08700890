use itam_core_db::models::ComponentModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct ComponentRepositoryImpl {
    pub executor: Executor,
}

impl ComponentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ComponentModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ComponentModel {
            id: row.try_get("id")?,
            uid: get_heapless_string(row, "uid")?,
            component_type: row.try_get("component_type")?,
            description: get_heapless_string(row, "description")?,
            cost: row.try_get("cost")?,
            status: row.try_get("status")?,
            owner_id: row.try_get("owner_id")?,
            host_computer_id: row.try_get("host_computer_id")?,
            asset_barcode: get_optional_heapless_string(row, "asset_barcode")?,
            history: row.try_get("history")?,
            is_deleted: row.try_get("is_deleted")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
