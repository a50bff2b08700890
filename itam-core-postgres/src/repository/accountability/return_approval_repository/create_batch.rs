use async_trait::async_trait;
use itam_core_db::models::ReturnApprovalModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::ReturnApprovalRepositoryImpl;

impl ReturnApprovalRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<ReturnApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ReturnApprovalModel>, Box<dyn Error + Send + Sync>> {
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
                INSERT INTO return_approval
                (id, accountability_id, checked_by, checked_on, received_by, received_on,
                 confirmed_by, confirmed_on, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(item.id)
            .bind(item.accountability_id)
            .bind(item.checked.map(|s| s.user_id))
            .bind(item.checked.map(|s| s.date))
            .bind(item.received.map(|s| s.user_id))
            .bind(item.received.map(|s| s.date))
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
impl CreateBatch<ReturnApprovalModel> for ReturnApprovalRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ReturnApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ReturnApprovalModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
