use async_trait::async_trait;
use itam_core_db::models::ComponentModel;
use itam_core_db::repository::FindByHostComputerIds;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{fetch_by_ids, TryFromRow};

use super::repo_impl::ComponentRepositoryImpl;

#[async_trait]
impl FindByHostComputerIds<ComponentModel> for ComponentRepositoryImpl {
    async fn find_by_host_computer_ids(
        &self,
        computer_ids: &[Uuid],
    ) -> Result<Vec<ComponentModel>, Box<dyn Error + Send + Sync>> {
        if computer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch_by_ids(
            &self.executor,
            r#"SELECT * FROM component WHERE host_computer_id = ANY($1) ORDER BY id FOR UPDATE"#,
            computer_ids,
        )
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ComponentModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
