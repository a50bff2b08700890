use async_trait::async_trait;
use itam_core_db::models::AccountabilityModel;
use itam_core_db::repository::{LoadBatch, LockBatch};
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, in_id_order};

use super::members::hydrate;
use super::repo_impl::AccountabilityRepositoryImpl;

impl AccountabilityRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &AccountabilityRepositoryImpl,
        ids: &[Uuid],
        for_update: bool,
    ) -> Result<Vec<Option<AccountabilityModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = if for_update {
            r#"SELECT * FROM accountability WHERE id = ANY($1) ORDER BY id FOR UPDATE"#
        } else {
            r#"SELECT * FROM accountability WHERE id = ANY($1)"#
        };
        let rows = fetch_by_ids(&repo.executor, query, ids).await?;
        let items = hydrate(repo, rows).await?;
        Ok(in_id_order(items, ids))
    }
}

#[async_trait]
impl LoadBatch<AccountabilityModel> for AccountabilityRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<AccountabilityModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, false).await
    }
}

#[async_trait]
impl LockBatch<AccountabilityModel> for AccountabilityRepositoryImpl {
    async fn lock_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<AccountabilityModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, true).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, LoadBatch};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_accountability;

    #[tokio::test]
    async fn test_load_batch_keeps_member_order() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let accountability_repo = &ctx.accountability_repos().accountability_repository;

        let mut record = create_test_accountability(Uuid::new_v4());
        record.asset_ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        record.computer_ids = vec![Uuid::new_v4()];
        let saved = accountability_repo
            .create_batch(vec![record], ctx.audit_log_id)
            .await?;

        let loaded = accountability_repo.load_batch(&[saved[0].id]).await?;
        assert_eq!(loaded[0].as_ref(), Some(&saved[0]));
        Ok(())
    }
}
