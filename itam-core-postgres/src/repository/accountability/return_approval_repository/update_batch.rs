use async_trait::async_trait;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::ReturnApprovalModel;
use itam_core_db::repository::UpdateBatch;
use itam_core_db::utils::stamp_updated;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, stale_version};

use super::repo_impl::ReturnApprovalRepositoryImpl;

impl ReturnApprovalRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<ReturnApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ReturnApprovalModel>, Box<dyn Error + Send + Sync>> {
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
                UPDATE return_approval
                SET checked_by = $2, checked_on = $3, received_by = $4, received_on = $5,
                    confirmed_by = $6, confirmed_on = $7, hash = $8, audit_log_id = $9
                WHERE id = $1 AND hash = $10
                "#,
            )
            .bind(item.id)
            .bind(item.checked.map(|s| s.user_id))
            .bind(item.checked.map(|s| s.date))
            .bind(item.received.map(|s| s.user_id))
            .bind(item.received.map(|s| s.date))
            .bind(item.confirmed.map(|s| s.user_id))
            .bind(item.confirmed.map(|s| s.date))
            .bind(item.hash)
            .bind(item.audit_log_id)
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            if result.rows_affected() == 0 {
                return Err(stale_version(EntityType::ReturnApproval, item.id));
            }
            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<ReturnApprovalModel> for ReturnApprovalRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<ReturnApprovalModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ReturnApprovalModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::accountability::accountability_repository::test_utils::test_utils::create_test_accountability;
    use crate::test_helper::setup_test_context;
    use chrono::NaiveDate;
    use itam_core_api::ReturnStage;
    use itam_core_db::is_concurrent_update;
    use itam_core_db::models::ApprovalStamp;
    use itam_core_db::repository::{CreateBatch, FindByAccountabilityId, UpdateBatch};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_return_approval;

    #[tokio::test]
    async fn test_concurrent_stage_stamps_conflict() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let repos = ctx.accountability_repos();

        let record = repos
            .accountability_repository
            .create_batch(vec![create_test_accountability(Uuid::new_v4())], ctx.audit_log_id)
            .await?;
        let approvals = &repos.return_approval_repository;
        let saved = approvals
            .create_batch(vec![create_test_return_approval(record[0].id)], ctx.audit_log_id)
            .await?;
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let mut checked = saved[0].clone();
        checked.set_stamp(ReturnStage::Checked, ApprovalStamp { user_id: Uuid::new_v4(), date });
        approvals.update_batch(vec![checked.clone()], Uuid::new_v4()).await?;

        let mut received = saved[0].clone();
        received.set_stamp(ReturnStage::Received, ApprovalStamp { user_id: Uuid::new_v4(), date });
        let err = approvals
            .update_batch(vec![received], Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(is_concurrent_update(err.as_ref()));

        let found = approvals.find_by_accountability_id(record[0].id).await?;
        assert_eq!(found[0].stamp(ReturnStage::Checked), checked.stamp(ReturnStage::Checked));
        assert!(found[0].stamp(ReturnStage::Received).is_none());
        Ok(())
    }
}
