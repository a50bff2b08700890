use itam_core_db::models::audit::AuditLinkModel;

use crate::utils::db_error;

use super::repo_impl::AuditRepositoryImpl;

impl AuditRepositoryImpl {
    pub(super) async fn create_links_impl(
        repo: &AuditRepositoryImpl,
        links: Vec<AuditLinkModel>,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>> {
        if links.is_empty() {
            return Ok(links);
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for link in &links {
            sqlx::query(
                r#"
                INSERT INTO audit_link (audit_log_id, entity_id, entity_type)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(link.audit_log_id)
            .bind(link.entity_id)
            .bind(link.entity_type)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;
        }

        Ok(links)
    }
}
