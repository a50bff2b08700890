use async_trait::async_trait;
use itam_core_db::models::UserModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::UserRepositoryImpl;

impl UserRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<UserModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<UserModel>, Box<dyn Error + Send + Sync>> {
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
                INSERT INTO app_user
                (id, employee_id, name, company, department, designation, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(item.id)
            .bind(item.employee_id.as_str())
            .bind(item.name.as_str())
            .bind(item.company.as_str())
            .bind(item.department.as_str())
            .bind(item.designation.as_ref().map(|s| s.as_str()))
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
impl CreateBatch<UserModel> for UserRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<UserModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<UserModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
