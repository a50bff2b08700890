use async_trait::async_trait;
use itam_core_db::models::AssetModel;
use itam_core_db::repository::FindByHostComputerIds;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, TryFromRow};

use super::repo_impl::AssetRepositoryImpl;

#[async_trait]
impl FindByHostComputerIds<AssetModel> for AssetRepositoryImpl {
    async fn find_by_host_computer_ids(
        &self,
        computer_ids: &[Uuid],
    ) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
        if computer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch_by_ids(
            &self.executor,
            r#"SELECT * FROM asset WHERE host_computer_id = ANY($1) ORDER BY id FOR UPDATE"#,
            computer_ids,
        )
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(AssetModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, FindByHostComputerIds};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_asset;

    #[tokio::test]
    async fn test_find_by_host_computer_ids() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let asset_repo = &ctx.inventory_repos().asset_repository;

        let host = Uuid::new_v4();
        let mut attached = create_test_asset("MON-0002");
        attached.host_computer_id = Some(host);
        let loose = create_test_asset("MON-0003");
        let saved = asset_repo
            .create_batch(vec![attached, loose], ctx.audit_log_id)
            .await?;

        let found = asset_repo
            .find_by_host_computer_ids(&[host, Uuid::new_v4()])
            .await?;
        assert_eq!(found, vec![saved[0].clone()]);
        Ok(())
    }
}
