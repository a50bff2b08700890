use async_trait::async_trait;
use itam_core_db::models::UserModel;
use itam_core_db::repository::{LoadBatch, LockBatch};
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, in_id_order, TryFromRow};

use super::repo_impl::UserRepositoryImpl;

impl UserRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &UserRepositoryImpl,
        ids: &[Uuid],
        for_update: bool,
    ) -> Result<Vec<Option<UserModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = if for_update {
            r#"SELECT * FROM app_user WHERE id = ANY($1) ORDER BY id FOR UPDATE"#
        } else {
            r#"SELECT * FROM app_user WHERE id = ANY($1)"#
        };
        let rows = fetch_by_ids(&repo.executor, query, ids).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(UserModel::try_from_row(&row)?);
        }
        Ok(in_id_order(items, ids))
    }
}

#[async_trait]
impl LoadBatch<UserModel> for UserRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<UserModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, false).await
    }
}

#[async_trait]
impl LockBatch<UserModel> for UserRepositoryImpl {
    async fn lock_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<UserModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids, true).await
    }
}
