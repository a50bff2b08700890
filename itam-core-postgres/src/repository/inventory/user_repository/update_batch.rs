use async_trait::async_trait;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::UserModel;
use itam_core_db::repository::UpdateBatch;
use itam_core_db::utils::stamp_updated;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, stale_version};

use super::repo_impl::UserRepositoryImpl;

impl UserRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<UserModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<UserModel>, Box<dyn Error + Send + Sync>> {
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
                UPDATE app_user
                SET employee_id = $2, name = $3, company = $4, department = $5,
                    designation = $6, hash = $7, audit_log_id = $8
                WHERE id = $1 AND hash = $9
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
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                return Err(stale_version(EntityType::User, item.id));
            }
            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<UserModel> for UserRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<UserModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<UserModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use heapless::String as HeaplessString;
    use itam_core_db::is_concurrent_update;
    use itam_core_db::repository::{CreateBatch, LoadBatch, UpdateBatch};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_user;

    #[tokio::test]
    async fn test_update_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let user_repo = &ctx.inventory_repos().user_repository;

        let mut saved = user_repo
            .create_batch(vec![create_test_user("Finance")], ctx.audit_log_id)
            .await?;
        let created_hash = saved[0].hash;
        saved[0].department = HeaplessString::try_from("Logistics").unwrap();

        let second_audit = Uuid::new_v4();
        let updated = user_repo.update_batch(saved, second_audit).await?;
        assert_ne!(updated[0].hash, created_hash);
        assert_eq!(updated[0].audit_log_id, Some(second_audit));

        let loaded = user_repo.load_batch(&[updated[0].id]).await?;
        assert_eq!(loaded[0].as_ref().unwrap().department.as_str(), "Logistics");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_batch_skips_unchanged() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let user_repo = &ctx.inventory_repos().user_repository;

        let saved = user_repo
            .create_batch(vec![create_test_user("Finance")], ctx.audit_log_id)
            .await?;
        let updated = user_repo.update_batch(saved.clone(), Uuid::new_v4()).await?;
        assert_eq!(updated, saved);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_batch_rejects_stale_hash() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let user_repo = &ctx.inventory_repos().user_repository;

        let saved = user_repo
            .create_batch(vec![create_test_user("Finance")], ctx.audit_log_id)
            .await?;

        let mut first = saved[0].clone();
        first.name = HeaplessString::try_from("First Writer").unwrap();
        user_repo.update_batch(vec![first], Uuid::new_v4()).await?;

        let mut second = saved[0].clone();
        second.name = HeaplessString::try_from("Second Writer").unwrap();
        let err = user_repo
            .update_batch(vec![second], Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(is_concurrent_update(err.as_ref()));
        Ok(())
    }
}
