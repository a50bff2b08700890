use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating multiple entities in a batch
/// 
/// This trait provides a standard interface for batch updating entities in a data store.
/// Any entity that implements the Identifiable trait can be updated using this trait.
/// All updates are performed within the session's transaction for atomicity.
/// Only updates items that have changed (based on hash comparison).
/// An item whose stored hash no longer matches the hash it was loaded with fails the
/// whole batch with [`crate::ConcurrentUpdateError`].
/// 
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl UpdateBatch<AssetModel> for AssetRepositoryImpl {
///     async fn update_batch(&self, items: Vec<AssetModel>, audit_log_id: Uuid) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait UpdateBatch<T: Identifiable>: Send + Sync {
    /// Update multiple items in the session's transaction
    /// 
    /// # Arguments
    /// * `items` - A vector of entities to update
    /// * `audit_log_id` - The UUID of the audit log for tracking this operation
    /// 
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of updated entities
    /// * `Err` - An error if the transaction could not be executed
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
