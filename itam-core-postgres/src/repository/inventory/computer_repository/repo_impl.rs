use itam_core_db::models::ComputerModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct ComputerRepositoryImpl {
    pub executor: Executor,
}

impl ComputerRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

/// Reads the `computer` row only; assigned assets and slots live in join tables
/// and are filled in by [`super::members::hydrate`]
impl TryFromRow<PgRow> for ComputerModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ComputerModel {
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
            assigned_assets: Vec::new(),
            components: Vec::new(),
            history: row.try_get("history")?,
            is_deleted: row.try_get("is_deleted")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
