use async_trait::async_trait;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::ComponentModel;
use itam_core_db::repository::UpdateBatch;
use itam_core_db::utils::stamp_updated;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, stale_version};

use super::repo_impl::ComponentRepositoryImpl;

impl ComponentRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<ComponentModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ComponentModel>, Box<dyn Error + Send + Sync>> {
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
                UPDATE component
                SET uid = $2, component_type = $3, description = $4, cost = $5, status = $6,
                    owner_id = $7, host_computer_id = $8, asset_barcode = $9, history = $10,
                    is_deleted = $11, hash = $12, audit_log_id = $13
                WHERE id = $1 AND hash = $14
                "#,
            )
            .bind(item.id)
            .bind(item.uid.as_str())
            .bind(item.component_type)
            .bind(item.description.as_str())
            .bind(item.cost)
            .bind(item.status)
            .bind(item.owner_id)
            .bind(item.host_computer_id)
            .bind(item.asset_barcode.as_ref().map(|s| s.as_str()))
            .bind(item.history.as_slice())
            .bind(item.is_deleted)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                return Err(stale_version(EntityType::Component, item.id));
            }
            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<ComponentModel> for ComponentRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<ComponentModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ComponentModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}
