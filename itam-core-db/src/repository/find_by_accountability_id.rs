use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Workflow rows (returns, approvals) attached to an accountability record
#[async_trait]
pub trait FindByAccountabilityId<T: Identifiable>: Send + Sync {
    async fn find_by_accountability_id(
        &self,
        accountability_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
