use async_trait::async_trait;
use itam_core_db::models::ComputerModel;
use itam_core_db::repository::FindByAssignedAsset;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::members::hydrate;
use super::repo_impl::ComputerRepositoryImpl;

#[async_trait]
impl FindByAssignedAsset for ComputerRepositoryImpl {
    async fn find_by_assigned_asset(
        &self,
        asset_id: Uuid,
    ) -> Result<Vec<ComputerModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(
                r#"
                SELECT c.* FROM computer c
                JOIN computer_assigned_asset a ON a.computer_id = c.id
                WHERE a.asset_id = $1
                ORDER BY c.id
                FOR UPDATE OF c
                "#,
            )
            .bind(asset_id)
            .fetch_all(&mut **transaction)
            .await
            .map_err(db_error)?
        };

        hydrate(self, rows).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, FindByAssignedAsset};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_computer;

    #[tokio::test]
    async fn test_find_by_assigned_asset() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let computer_repo = &ctx.inventory_repos().computer_repository;

        let asset_id = Uuid::new_v4();
        let mut host = create_test_computer("PC-0004");
        host.attach_asset(asset_id);
        let other = create_test_computer("PC-0005");
        let saved = computer_repo
            .create_batch(vec![host, other], ctx.audit_log_id)
            .await?;

        let found = computer_repo.find_by_assigned_asset(asset_id).await?;
        assert_eq!(found, vec![saved[0].clone()]);

        let none = computer_repo.find_by_assigned_asset(Uuid::new_v4()).await?;
        assert!(none.is_empty());
        Ok(())
    }
}
