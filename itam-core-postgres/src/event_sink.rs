use async_trait::async_trait;
use itam_core_db::models::audit::AuditEvent;
use itam_core_db::repository::AuditEventSink;
use sqlx::PgPool;
use std::error::Error;
use std::sync::Arc;
use tracing::debug;

use crate::utils::db_error;

/// Appends committed audit events to `audit_event`
///
/// Runs outside the operation's transaction: events are published only after
/// the state they describe is durable.
pub struct PostgresAuditEventSink {
    pool: Arc<PgPool>,
}

impl PostgresAuditEventSink {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditEventSink for PostgresAuditEventSink {
    async fn publish(&self, event: &AuditEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO audit_event
                (entity_type, entity_id, action, acting_user_id, occurred_at, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.entity_type)
        .bind(event.entity_id)
        .bind(event.action)
        .bind(event.acting_user_id)
        .bind(event.timestamp)
        .bind(event.details.clone())
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        debug!(entity_id = %event.entity_id, action = ?event.action, "Audit event stored");
        Ok(())
    }
}
