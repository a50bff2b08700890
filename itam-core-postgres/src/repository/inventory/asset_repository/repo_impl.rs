use itam_core_db::models::AssetModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct AssetRepositoryImpl {
    pub executor: Executor,
}

impl AssetRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for AssetModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AssetModel {
            id: row.try_get("id")?,
            asset_type: get_heapless_string(row, "asset_type")?,
            asset_barcode: get_heapless_string(row, "asset_barcode")?,
            brand: get_optional_heapless_string(row, "brand")?,
            model: get_optional_heapless_string(row, "model")?,
            serial_no: get_optional_heapless_string(row, "serial_no")?,
            cost: row.try_get("cost")?,
            date_acquired: row.try_get("date_acquired")?,
            remarks: get_optional_heapless_string(row, "remarks")?,
            status: row.try_get("status")?,
            owner_id: row.try_get("owner_id")?,
            host_computer_id: row.try_get("host_computer_id")?,
            history: row.try_get("history")?,
            root_history: row.try_get("root_history")?,
            is_deleted: row.try_get("is_deleted")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
