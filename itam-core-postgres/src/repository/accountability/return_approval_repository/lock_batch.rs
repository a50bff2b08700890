use async_trait::async_trait;
use itam_core_db::models::ReturnApprovalModel;
use itam_core_db::repository::LockBatch;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, in_id_order, TryFromRow};

use super::repo_impl::ReturnApprovalRepositoryImpl;

#[async_trait]
impl LockBatch<ReturnApprovalModel> for ReturnApprovalRepositoryImpl {
    async fn lock_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<ReturnApprovalModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch_by_ids(
            &self.executor,
            r#"SELECT * FROM return_approval WHERE id = ANY($1) ORDER BY id FOR UPDATE"#,
            ids,
        )
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ReturnApprovalModel::try_from_row(&row)?);
        }
        Ok(in_id_order(items, ids))
    }
}
