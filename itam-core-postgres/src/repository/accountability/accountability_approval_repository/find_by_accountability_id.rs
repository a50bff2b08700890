use async_trait::async_trait;
use itam_core_db::models::AccountabilityApprovalModel;
use itam_core_db::repository::FindByAccountabilityId;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, TryFromRow};

use super::repo_impl::AccountabilityApprovalRepositoryImpl;

#[async_trait]
impl FindByAccountabilityId<AccountabilityApprovalModel> for AccountabilityApprovalRepositoryImpl {
    async fn find_by_accountability_id(
        &self,
        accountability_id: Uuid,
    ) -> Result<Vec<AccountabilityApprovalModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM accountability_approval WHERE accountability_id = $1"#)
                .bind(accountability_id)
                .fetch_all(&mut **transaction)
                .await
                .map_err(db_error)?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(AccountabilityApprovalModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
