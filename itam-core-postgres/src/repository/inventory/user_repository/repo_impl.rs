use itam_core_db::models::UserModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct UserRepositoryImpl {
    pub executor: Executor,
}

impl UserRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for UserModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(UserModel {
            id: row.try_get("id")?,
            employee_id: get_heapless_string(row, "employee_id")?,
            name: get_heapless_string(row, "name")?,
            company: get_heapless_string(row, "company")?,
            department: get_heapless_string(row, "department")?,
            designation: get_optional_heapless_string(row, "designation")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
