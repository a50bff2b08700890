use async_trait::async_trait;
use chrono::SubsecRound;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::AccountabilityModel;
use itam_core_db::repository::UpdateBatch;
use itam_core_db::utils::stamp_updated;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, stale_version};

use super::members::replace_members;
use super::repo_impl::AccountabilityRepositoryImpl;

impl AccountabilityRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<AccountabilityModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::with_capacity(items.len());
        let mut changed = Vec::new();
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let previous_hash = item.hash;
            item.date_created = item.date_created.trunc_subsecs(6);
            if !stamp_updated(&mut item, audit_log_id)? {
                updated_items.push(item);
                continue;
            }

            let result = sqlx::query(
                r#"
                UPDATE accountability
                SET accountability_code = $2, tracking_code = $3, owner_id = $4, is_active = $5,
                    is_deleted = $6, date_created = $7, hash = $8, audit_log_id = $9
                WHERE id = $1 AND hash = $10
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
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                return Err(stale_version(EntityType::Accountability, item.id));
            }
            changed.push(updated_items.len());
            updated_items.push(item);
        }

        let changed_items: Vec<&AccountabilityModel> =
            changed.iter().map(|index| &updated_items[*index]).collect();
        replace_members(&mut **transaction, &changed_items).await?;

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<AccountabilityModel> for AccountabilityRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<AccountabilityModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, LoadBatch, UpdateBatch};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_accountability;

    #[tokio::test]
    async fn test_merge_moves_members_and_soft_deletes() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let accountability_repo = &ctx.accountability_repos().accountability_repository;

        let asset_id = Uuid::new_v4();
        let computer_id = Uuid::new_v4();
        let mut losing = create_test_accountability(Uuid::new_v4());
        losing.asset_ids = vec![asset_id];
        losing.computer_ids = vec![computer_id];
        let keeping = create_test_accountability(Uuid::new_v4());
        let mut saved = accountability_repo
            .create_batch(vec![keeping, losing], ctx.audit_log_id)
            .await?;

        saved[0].add_asset(asset_id);
        saved[0].add_computer(computer_id);
        saved[1].soft_delete();
        let updated = accountability_repo.update_batch(saved, Uuid::new_v4()).await?;

        let loaded = accountability_repo
            .load_batch(&[updated[0].id, updated[1].id])
            .await?;
        let keeping = loaded[0].as_ref().unwrap();
        let losing = loaded[1].as_ref().unwrap();
        assert_eq!(keeping.asset_ids, vec![asset_id]);
        assert_eq!(keeping.computer_ids, vec![computer_id]);
        assert!(losing.is_deleted);
        assert!(losing.is_empty());
        assert_eq!(keeping, &updated[0]);
        Ok(())
    }
}
