use async_trait::async_trait;
use itam_core_db::models::ComputerModel;
use itam_core_db::repository::{FindVacant, Page, PageRequest};
use sqlx::Row;
use std::error::Error;

use crate::utils::db_error;

use super::members::hydrate;
use super::repo_impl::ComputerRepositoryImpl;

#[async_trait]
impl FindVacant<ComputerModel> for ComputerRepositoryImpl {
    async fn find_vacant(
        &self,
        page: PageRequest,
    ) -> Result<Page<ComputerModel>, Box<dyn Error + Send + Sync>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            let total: i64 = sqlx::query(
                r#"SELECT COUNT(*) AS total FROM computer WHERE owner_id IS NULL AND NOT is_deleted"#,
            )
            .fetch_one(&mut **transaction)
            .await
            .map_err(db_error)?
            .try_get("total")?;

            let rows = sqlx::query(
                r#"
                SELECT * FROM computer
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

        let items = hydrate(self, rows).await?;
        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}
