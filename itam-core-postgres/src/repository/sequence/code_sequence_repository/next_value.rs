use async_trait::async_trait;
use itam_core_db::models::CodeFamily;
use itam_core_db::repository::CodeSequence;
use sqlx::Row;
use std::error::Error;

use crate::utils::db_error;

use super::repo_impl::CodeSequenceRepositoryImpl;

#[async_trait]
impl CodeSequence for CodeSequenceRepositoryImpl {
    async fn next_value(&self, family: CodeFamily) -> Result<i64, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(
                r#"
                UPDATE code_counter SET value = value + 1
                WHERE family = $1
                RETURNING value
                "#,
            )
            .bind(family)
            .fetch_optional(&mut **transaction)
            .await
            .map_err(db_error)?
        };

        match row {
            Some(row) => Ok(row.try_get("value")?),
            None => Err(format!("No counter row for code family {family:?}").into()),
        }
    }
}
