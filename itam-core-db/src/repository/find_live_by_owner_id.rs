use async_trait::async_trait;
use uuid::Uuid;

use crate::models::AccountabilityModel;

/// Repository trait for the single live accountability record of an owner
///
/// The returned record is locked like [`super::LockBatch`] rows, since callers
/// find it in order to merge into it.
#[async_trait]
pub trait FindLiveByOwnerId: Send + Sync {
    /// # Returns
    /// * `Ok(Some(record))` - The owner's record with `is_deleted == false`
    /// * `Ok(None)` - The owner holds nothing
    async fn find_live_by_owner_id(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<AccountabilityModel>, Box<dyn std::error::Error + Send + Sync>>;
}
