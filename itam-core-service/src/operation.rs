use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use itam_core_api::ApiResult;
use itam_core_db::models::audit::{AuditAction, AuditEvent, AuditLinkModel, AuditLogModel, EntityType};
use itam_core_db::UnitOfWorkSession;
use uuid::Uuid;

/// Per-attempt state of one engine operation
///
/// Holds the audit log every written row references, the audit links of the rows
/// touched so far and the events to publish once the transaction has committed.
#[derive(Debug)]
pub struct OperationContext {
    audit_log: AuditLogModel,
    links: Vec<AuditLinkModel>,
    events: Vec<AuditEvent>,
}

impl OperationContext {
    pub fn new(acting_user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            audit_log: AuditLogModel {
                id: Uuid::new_v4(),
                updated_at: now,
                updated_by_person_id: acting_user_id,
            },
            links: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn audit_log(&self) -> &AuditLogModel {
        &self.audit_log
    }

    pub fn audit_log_id(&self) -> Uuid {
        self.audit_log.id
    }

    pub fn acting_user_id(&self) -> Uuid {
        self.audit_log.updated_by_person_id
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.audit_log.updated_at
    }

    pub fn today(&self) -> NaiveDate {
        self.audit_log.updated_at.date_naive()
    }

    /// Links a written row to this operation's audit log; repeated calls are ignored
    pub fn touch(&mut self, entity_type: EntityType, entity_id: Uuid) {
        let linked = self
            .links
            .iter()
            .any(|link| link.entity_id == entity_id && link.entity_type == entity_type);
        if !linked {
            self.links.push(AuditLinkModel {
                audit_log_id: self.audit_log.id,
                entity_id,
                entity_type,
            });
        }
    }

    pub fn emit(
        &mut self,
        entity_type: EntityType,
        entity_id: Uuid,
        action: AuditAction,
        details: serde_json::Value,
    ) {
        self.events.push(AuditEvent {
            entity_type,
            entity_id,
            action,
            acting_user_id: self.audit_log.updated_by_person_id,
            timestamp: self.audit_log.updated_at,
            details,
        });
    }

    pub fn take_links(&mut self) -> Vec<AuditLinkModel> {
        std::mem::take(&mut self.links)
    }

    pub fn into_events(self) -> Vec<AuditEvent> {
        self.events
    }
}

/// One unit of engine work, executed inside a single session
///
/// `execute` may be called more than once when a concurrency conflict is retried,
/// each time with a fresh session and context; it must not keep state between calls.
#[async_trait]
pub trait Operation<S: UnitOfWorkSession>: Send + Sync {
    type Output: Send;

    const NAME: &'static str;

    fn acting_user_id(&self) -> Uuid;

    /// Read-only operations write no audit log and never commit
    fn read_only(&self) -> bool {
        false
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<Self::Output>;
}
