use async_trait::async_trait;
use chrono::SubsecRound;
use itam_core_db::models::AccountabilityModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::members::insert_members;
use super::repo_impl::AccountabilityRepositoryImpl;

impl AccountabilityRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<AccountabilityModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            // TIMESTAMPTZ keeps microseconds; hash what will be read back
            item.date_created = item.date_created.trunc_subsecs(6);
            stamp_created(&mut item, audit_log_id)?;
            sqlx::query(
                r#"
                INSERT INTO accountability
                (id, accountability_code, tracking_code, owner_id, is_active, is_deleted,
                 date_created, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.accountability_code.as_str())
            .bind(item.tracking_code.as_str())
            .bind(item.owner_id)
            .bind(item.is_active)
            .bind(item.is_deleted)
            .bind(item.date_created)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            saved_items.push(item);
        }

        for item in &saved_items {
            insert_members(&mut **transaction, item).await?;
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<AccountabilityModel> for AccountabilityRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<AccountabilityModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
