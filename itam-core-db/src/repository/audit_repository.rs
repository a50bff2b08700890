use async_trait::async_trait;
use uuid::Uuid;

use crate::models::audit::{AuditLinkModel, AuditLogModel};

/// Storage of the per-operation audit log and the links to every entity it touched
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn create_log(
        &self,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>>;

    async fn create_links(
        &self,
        links: Vec<AuditLinkModel>,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_links_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>>;
}
