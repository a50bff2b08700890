use async_trait::async_trait;
use uuid::Uuid;

use crate::models::AccountabilityModel;

/// Live accountability records listing any of the given asset or computer ids, locked
#[async_trait]
pub trait FindLiveByMemberIds: Send + Sync {
    async fn find_live_by_member_ids(
        &self,
        item_ids: &[Uuid],
    ) -> Result<Vec<AccountabilityModel>, Box<dyn std::error::Error + Send + Sync>>;
}
