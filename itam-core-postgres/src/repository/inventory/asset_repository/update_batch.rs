use async_trait::async_trait;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::AssetModel;
use itam_core_db::repository::UpdateBatch;
use itam_core_db::utils::stamp_updated;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, stale_version};

use super::repo_impl::AssetRepositoryImpl;

impl AssetRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<AssetModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let previous_hash = item.hash;
            if !stamp_updated(&mut item, audit_log_id)? {
                updated_items.push(item);
                continue;
            }

            let result = sqlx::query(
                r#"
                UPDATE asset
                SET asset_type = $2, asset_barcode = $3, brand = $4, model = $5, serial_no = $6,
                    cost = $7, date_acquired = $8, remarks = $9, status = $10, owner_id = $11,
                    host_computer_id = $12, history = $13, root_history = $14, is_deleted = $15,
                    hash = $16, audit_log_id = $17
                WHERE id = $1 AND hash = $18
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
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                return Err(stale_version(EntityType::Asset, item.id));
            }
            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<AssetModel> for AssetRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<AssetModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}
