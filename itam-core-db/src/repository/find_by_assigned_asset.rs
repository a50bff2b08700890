use async_trait::async_trait;
use uuid::Uuid;

use crate::models::ComputerModel;

/// Computers whose `assigned_assets` list the given id, locked
#[async_trait]
pub trait FindByAssignedAsset: Send + Sync {
    async fn find_by_assigned_asset(
        &self,
        asset_id: Uuid,
    ) -> Result<Vec<ComputerModel>, Box<dyn std::error::Error + Send + Sync>>;
}
