use itam_core_db::models::AccountabilityModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct AccountabilityRepositoryImpl {
    pub executor: Executor,
}

impl AccountabilityRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

/// Member lists are read separately by [`super::members::hydrate`]
impl TryFromRow<PgRow> for AccountabilityModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AccountabilityModel {
            id: row.try_get("id")?,
            accountability_code: get_heapless_string(row, "accountability_code")?,
            tracking_code: get_heapless_string(row, "tracking_code")?,
            owner_id: row.try_get("owner_id")?,
            asset_ids: Vec::new(),
            computer_ids: Vec::new(),
            is_active: row.try_get("is_active")?,
            is_deleted: row.try_get("is_deleted")?,
            date_created: row.try_get("date_created")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
