use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Registered,
    OwnerAssigned,
    PulledIn,
    PulledOut,
    AccountabilityMerged,
    AccountabilityDeleted,
    ReturnSubmitted,
    ApprovalAdvanced,
    Deleted,
    Released,
}

/// # Documentation
/// - Centralized log entry handed to the audit sink after a transaction commits.
/// - Delivery is best effort; a failed delivery never undoes the committed change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub action: AuditAction,
    pub acting_user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}
