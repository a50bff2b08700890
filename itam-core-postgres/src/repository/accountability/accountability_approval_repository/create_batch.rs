use async_trait::async_trait;
use itam_core_db::models::AccountabilityApprovalModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::AccountabilityApprovalRepositoryImpl;

impl AccountabilityApprovalRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<AccountabilityApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityApprovalModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            stamp_created(&mut item, audit_log_id)?;
            sqlx::query(
                r#"
                INSERT INTO accountability_approval
                (id, accountability_id, prepared_by, prepared_on, approved_by, approved_on,
                 confirmed_by, confirmed_on, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(item.id)
            .bind(item.accountability_id)
            .bind(item.prepared.map(|s| s.user_id))
            .bind(item.prepared.map(|s| s.date))
            .bind(item.approved.map(|s| s.user_id))
            .bind(item.approved.map(|s| s.date))
            .bind(item.confirmed.map(|s| s.user_id))
            .bind(item.confirmed.map(|s| s.date))
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<AccountabilityApprovalModel> for AccountabilityApprovalRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<AccountabilityApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityApprovalModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
