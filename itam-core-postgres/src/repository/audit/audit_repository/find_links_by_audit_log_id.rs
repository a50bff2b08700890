use itam_core_db::models::audit::AuditLinkModel;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::AuditRepositoryImpl;

impl AuditRepositoryImpl {
    pub(super) async fn find_links_by_audit_log_id_impl(
        repo: &AuditRepositoryImpl,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query_as::<_, AuditLinkModel>(
            r#"
            SELECT audit_log_id, entity_id, entity_type
            FROM audit_link
            WHERE audit_log_id = $1
            ORDER BY entity_type, entity_id
            "#,
        )
        .bind(audit_log_id);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(query.fetch_all(&mut **transaction).await.map_err(db_error)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::models::audit::{AuditLinkModel, EntityType};
    use itam_core_db::repository::AuditRepository;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_links_are_found_by_audit_log() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let audit_repo = ctx.audit_repo();

        let asset_link = AuditLinkModel {
            audit_log_id: ctx.audit_log_id,
            entity_id: Uuid::new_v4(),
            entity_type: EntityType::Asset,
        };
        let record_link = AuditLinkModel {
            audit_log_id: ctx.audit_log_id,
            entity_id: Uuid::new_v4(),
            entity_type: EntityType::Accountability,
        };
        audit_repo
            .create_links(vec![asset_link.clone(), record_link.clone(), asset_link.clone()])
            .await?;

        let links = audit_repo.find_links_by_audit_log_id(ctx.audit_log_id).await?;
        assert_eq!(links, vec![asset_link, record_link]);

        let none = audit_repo.find_links_by_audit_log_id(Uuid::new_v4()).await?;
        assert!(none.is_empty());
        Ok(())
    }
}
