use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;
use crate::models::Identifiable;

/// # Documentation
/// - Struct to maintain an audit log
/// - One audit log per engine operation, all rows written by the operation reference the same audit log.
/// - `updated_by_person_id` is the acting user of the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by_person_id: Uuid,
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
