use async_trait::async_trait;
use itam_core_db::models::AccountabilityModel;
use itam_core_db::repository::FindLiveByMemberIds;
use std::error::Error;
use uuid::Uuid;

use crate::utils::fetch_by_ids;

use super::members::hydrate;
use super::repo_impl::AccountabilityRepositoryImpl;

#[async_trait]
impl FindLiveByMemberIds for AccountabilityRepositoryImpl {
    async fn find_live_by_member_ids(
        &self,
        item_ids: &[Uuid],
    ) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch_by_ids(
            &self.executor,
            r#"
            SELECT * FROM accountability
            WHERE NOT is_deleted
              AND id IN (
                  SELECT accountability_id FROM accountability_asset WHERE asset_id = ANY($1)
                  UNION
                  SELECT accountability_id FROM accountability_computer WHERE computer_id = ANY($1)
              )
            ORDER BY id
            FOR UPDATE
            "#,
            item_ids,
        )
        .await?;

        hydrate(self, rows).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, FindLiveByMemberIds};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_accountability;

    #[tokio::test]
    async fn test_find_live_by_member_ids() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let accountability_repo = &ctx.accountability_repos().accountability_repository;

        let asset_id = Uuid::new_v4();
        let computer_id = Uuid::new_v4();
        let mut by_asset = create_test_accountability(Uuid::new_v4());
        by_asset.asset_ids = vec![asset_id];
        let mut by_computer = create_test_accountability(Uuid::new_v4());
        by_computer.computer_ids = vec![computer_id];
        let unrelated = create_test_accountability(Uuid::new_v4());
        let saved = accountability_repo
            .create_batch(vec![by_asset, by_computer, unrelated], ctx.audit_log_id)
            .await?;

        let found = accountability_repo
            .find_live_by_member_ids(&[asset_id, computer_id])
            .await?;
        let mut found_ids: Vec<Uuid> = found.iter().map(|r| r.id).collect();
        found_ids.sort();
        let mut expected = vec![saved[0].id, saved[1].id];
        expected.sort();
        assert_eq!(found_ids, expected);
        Ok(())
    }
}
