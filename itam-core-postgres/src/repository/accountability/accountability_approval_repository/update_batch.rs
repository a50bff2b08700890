use async_trait::async_trait;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::AccountabilityApprovalModel;
use itam_core_db::repository::UpdateBatch;
use itam_core_db::utils::stamp_updated;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, stale_version};

use super::repo_impl::AccountabilityApprovalRepositoryImpl;

impl AccountabilityApprovalRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<AccountabilityApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityApprovalModel>, Box<dyn Error + Send + Sync>> {
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
                UPDATE accountability_approval
                SET prepared_by = $2, prepared_on = $3, approved_by = $4, approved_on = $5,
                    confirmed_by = $6, confirmed_on = $7, hash = $8, audit_log_id = $9
                WHERE id = $1 AND hash = $10
                "#,
            )
            .bind(item.id)
            .bind(item.prepared.map(|s| s.user_id))
            .bind(item.prepared.map(|s| s.date))
            .bind(item.approved.map(|s| s.user_id))
            .bind(item.approved.map(|s| s.date))
            .bind(item.confirmed.map(|s| s.user_id))
            .bind(item.confirmed.map(|s| s.date))
            .bind(item.hash)
            .bind(item.audit_log_id)
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                return Err(stale_version(EntityType::AccountabilityApproval, item.id));
            }
            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<AccountabilityApprovalModel> for AccountabilityApprovalRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<AccountabilityApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<AccountabilityApprovalModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::accountability::accountability_repository::test_utils::test_utils::create_test_accountability;
    use crate::test_helper::setup_test_context;
    use chrono::NaiveDate;
    use itam_core_api::AccountabilityStage;
    use itam_core_db::models::ApprovalStamp;
    use itam_core_db::repository::{CreateBatch, FindByAccountabilityId, LockBatch, UpdateBatch};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_accountability_approval;

    #[tokio::test]
    async fn test_stamps_persist_per_stage() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let repos = ctx.accountability_repos();

        let record = repos
            .accountability_repository
            .create_batch(vec![create_test_accountability(Uuid::new_v4())], ctx.audit_log_id)
            .await?;
        let approvals = &repos.accountability_approval_repository;
        let saved = approvals
            .create_batch(
                vec![create_test_accountability_approval(record[0].id)],
                ctx.audit_log_id,
            )
            .await?;

        let mut locked = approvals.lock_batch(&[saved[0].id]).await?;
        let mut approval = locked.remove(0).unwrap();
        let stamp = ApprovalStamp {
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        };
        approval.set_stamp(AccountabilityStage::Approved, stamp);
        approvals.update_batch(vec![approval], Uuid::new_v4()).await?;

        let found = approvals.find_by_accountability_id(record[0].id).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stamp(AccountabilityStage::Approved), Some(&stamp));
        assert!(found[0].stamp(AccountabilityStage::Prepared).is_none());
        assert!(found[0].stamp(AccountabilityStage::Confirmed).is_none());
        Ok(())
    }
}
