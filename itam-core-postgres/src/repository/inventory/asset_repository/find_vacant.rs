use async_trait::async_trait;
use itam_core_db::models::AssetModel;
use itam_core_db::repository::{FindVacant, Page, PageRequest};
use sqlx::Row;
use std::error::Error;

use crate::utils::{db_error, TryFromRow};

use super::repo_impl::AssetRepositoryImpl;

#[async_trait]
impl FindVacant<AssetModel> for AssetRepositoryImpl {
    async fn find_vacant(
        &self,
        page: PageRequest,
    ) -> Result<Page<AssetModel>, Box<dyn Error + Send + Sync>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            let total: i64 = sqlx::query(
                r#"SELECT COUNT(*) AS total FROM asset WHERE owner_id IS NULL AND NOT is_deleted"#,
            )
            .fetch_one(&mut **transaction)
            .await
            .map_err(db_error)?
            .try_get("total")?;

            let rows = sqlx::query(
                r#"
                SELECT * FROM asset
                WHERE owner_id IS NULL AND NOT is_deleted
                ORDER BY id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page.limit as i64)
            .bind(page.offset as i64)
            .fetch_all(&mut **transaction)
            .await
            .map_err(db_error)?;
            (total, rows)
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(AssetModel::try_from_row(&row)?);
        }
        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, FindVacant, PageRequest};
    use uuid::Uuid;
    use super::super::test_utils::test_utils::create_test_asset;

    #[tokio::test]
    async fn test_find_vacant_skips_owned_and_deleted() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let asset_repo = &ctx.inventory_repos().asset_repository;

        let vacant = create_test_asset("VAC-0001");
        let mut owned = create_test_asset("VAC-0002");
        owned.owner_id = Some(Uuid::new_v4());
        let mut deleted = create_test_asset("VAC-0003");
        deleted.is_deleted = true;
        let saved = asset_repo
            .create_batch(vec![vacant, owned, deleted], ctx.audit_log_id)
            .await?;

        // other rows may already be committed, so page through everything
        let page = asset_repo
            .find_vacant(PageRequest::new(i32::MAX as usize, 0))
            .await?;
        let ids: Vec<_> = page.items.iter().map(|a| a.id).collect();
        assert!(ids.contains(&saved[0].id));
        assert!(!ids.contains(&saved[1].id));
        assert!(!ids.contains(&saved[2].id));
        assert_eq!(page.total, page.items.len());

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        Ok(())
    }
}
