use async_trait::async_trait;
use itam_core_db::models::AssetModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::AssetRepositoryImpl;

impl AssetRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<AssetModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
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
                INSERT INTO asset
                (id, asset_type, asset_barcode, brand, model, serial_no, cost, date_acquired,
                 remarks, status, owner_id, host_computer_id, history, root_history, is_deleted,
                 hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                "#,
            )
            .bind(item.id)
            .bind(item.asset_type.as_str())
            .bind(item.asset_barcode.as_str())
            .bind(item.brand.as_ref().map(|s| s.as_str()))
            .bind(item.model.as_ref().map(|s| s.as_str()))
            .bind(item.serial_no.as_ref().map(|s| s.as_str()))
            .bind(item.cost)
            .bind(item.date_acquired)
            .bind(item.remarks.as_ref().map(|s| s.as_str()))
            .bind(item.status)
            .bind(item.owner_id)
            .bind(item.host_computer_id)
            .bind(item.history.as_slice())
            .bind(item.root_history.as_slice())
            .bind(item.is_deleted)
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
impl CreateBatch<AssetModel> for AssetRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<AssetModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
