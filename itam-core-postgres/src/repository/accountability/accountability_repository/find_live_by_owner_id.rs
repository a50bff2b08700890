use async_trait::async_trait;
use itam_core_db::models::AccountabilityModel;
use itam_core_db::repository::FindLiveByOwnerId;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::members::hydrate;
use super::repo_impl::AccountabilityRepositoryImpl;

#[async_trait]
impl FindLiveByOwnerId for AccountabilityRepositoryImpl {
    async fn find_live_by_owner_id(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(
                r#"SELECT * FROM accountability WHERE owner_id = $1 AND NOT is_deleted FOR UPDATE"#,
            )
            .bind(owner_id)
            .fetch_all(&mut **transaction)
            .await
            .map_err(db_error)?
        };

        Ok(hydrate(self, rows).await?.into_iter().next())
    }
}
