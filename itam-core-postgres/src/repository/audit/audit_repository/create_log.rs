use itam_core_db::models::audit::AuditLogModel;

use crate::utils::db_error;

use super::repo_impl::AuditRepositoryImpl;

impl AuditRepositoryImpl {
    pub(super) async fn create_log_impl(
        repo: &AuditRepositoryImpl,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query(
            r#"
            INSERT INTO audit_log (id, updated_at, updated_by_person_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(audit_log.id)
        .bind(audit_log.updated_at)
        .bind(audit_log.updated_by_person_id);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        query.execute(&mut **transaction).await.map_err(db_error)?;

        Ok(audit_log.clone())
    }
}
