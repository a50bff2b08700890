use async_trait::async_trait;
use itam_core_db::models::audit::{AuditLinkModel, AuditLogModel};
use itam_core_db::repository::AuditRepository;
use uuid::Uuid;

use crate::executor::Executor;

pub struct AuditRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl AuditRepository for AuditRepositoryImpl {
    async fn create_log(
        &self,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>> {
        Self::create_log_impl(self, audit_log).await
    }

    async fn create_links(
        &self,
        links: Vec<AuditLinkModel>,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>> {
        Self::create_links_impl(self, links).await
    }

    async fn find_links_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>> {
        Self::find_links_by_audit_log_id_impl(self, audit_log_id).await
    }
}
