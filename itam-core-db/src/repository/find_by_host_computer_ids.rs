use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Repository trait for items attached to any of the given computers
///
/// Used by cascades that follow a computer's ownership down to its peripherals
/// and components. Returned rows are locked for the rest of the unit of work.
///
/// # Type Parameters
/// * `T` - `AssetModel` (peripherals) or `ComponentModel` (installed parts)
#[async_trait]
pub trait FindByHostComputerIds<T: Identifiable>: Send + Sync {
    async fn find_by_host_computer_ids(
        &self,
        computer_ids: &[Uuid],
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
