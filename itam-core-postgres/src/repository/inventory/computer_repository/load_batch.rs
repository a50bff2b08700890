use async_trait::async_trait;
use itam_core_db::models::ComputerModel;
use itam_core_db::repository::{LoadBatch, LockBatch};
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, in_id_order};

use super::members::hydrate;
use super::repo_impl::ComputerRepositoryImpl;

impl ComputerRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &ComputerRepositoryImpl,
        ids: &[Uuid],
        for_update: bool,
    ) -> Result<Vec<Option<ComputerModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = if for_update {
            r#"SELECT * FROM computer WHERE id = ANY($1) ORDER BY id FOR UPDATE"#
        } else {
            r#"SELECT * FROM computer WHERE id = ANY($1)"#
        };
        let rows = fetch_by_ids(&repo.executor, query, ids).await?;
        let items = hydrate(repo, rows).await?;
        Ok(in_id_order(items, ids))
    }
}

#[async_trait]
impl LoadBatch<ComputerModel> for ComputerRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<ComputerModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, false).await
    }
}

#[async_trait]
impl LockBatch<ComputerModel> for ComputerRepositoryImpl {
    async fn lock_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<ComputerModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, true).await
    }
}
