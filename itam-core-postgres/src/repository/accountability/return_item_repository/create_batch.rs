use async_trait::async_trait;
use itam_core_db::models::ReturnItemModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::ReturnItemRepositoryImpl;

impl ReturnItemRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<ReturnItemModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ReturnItemModel>, Box<dyn Error + Send + Sync>> {
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
                INSERT INTO return_item
                (id, accountability_id, item_kind, item_id, remarks, returned_by, return_date,
                 hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.accountability_id)
            .bind(item.item_kind)
            .bind(item.item_id)
            .bind(item.remarks.as_ref().map(|s| s.as_str()))
            .bind(item.returned_by)
            .bind(item.return_date)
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
impl CreateBatch<ReturnItemModel> for ReturnItemRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ReturnItemModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ReturnItemModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
