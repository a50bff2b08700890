use async_trait::async_trait;
use itam_core_db::models::ComponentModel;
use itam_core_db::repository::{LoadBatch, LockBatch};
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, in_id_order, TryFromRow};

use super::repo_impl::ComponentRepositoryImpl;

impl ComponentRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &ComponentRepositoryImpl,
        ids: &[Uuid],
        for_update: bool,
    ) -> Result<Vec<Option<ComponentModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = if for_update {
            r#"SELECT * FROM component WHERE id = ANY($1) ORDER BY id FOR UPDATE"#
        } else {
            r#"SELECT * FROM component WHERE id = ANY($1)"#
        };
        let rows = fetch_by_ids(&repo.executor, query, ids).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ComponentModel::try_from_row(&row)?);
        }
        Ok(in_id_order(items, ids))
    }
}

#[async_trait]
impl LoadBatch<ComponentModel> for ComponentRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<ComponentModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, false).await
    }
}

#[async_trait]
impl LockBatch<ComponentModel> for ComponentRepositoryImpl {
    async fn lock_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<ComponentModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, true).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_api::ComponentType;
    use itam_core_db::repository::{CreateBatch, LoadBatch};
    use rust_decimal::Decimal;
    use super::super::test_utils::test_utils::create_test_component;

    #[tokio::test]
    async fn test_load_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let component_repo = &ctx.inventory_repos().component_repository;

        let mut component = create_test_component(ComponentType::Ram);
        component.cost = Some(Decimal::new(4500, 2));
        let saved = component_repo
            .create_batch(vec![component], ctx.audit_log_id)
            .await?;

        let loaded = component_repo.load_batch(&[saved[0].id]).await?;
        assert_eq!(loaded[0].as_ref(), Some(&saved[0]));
        Ok(())
    }
}
