use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for creating multiple entities in a batch
/// 
/// This trait provides a standard interface for batch creating entities in a data store.
/// Any entity that implements the Identifiable trait can be created using this trait.
/// All creates are performed within the session's transaction for atomicity.
/// Returns saved items with hash and audit log id populated.
/// 
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl CreateBatch<AssetModel> for AssetRepositoryImpl {
///     async fn create_batch(&self, items: Vec<AssetModel>, audit_log_id: Uuid) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait CreateBatch<T: Identifiable>: Send + Sync {
    /// Save multiple items in the session's transaction
    /// 
    /// # Arguments
    /// * `items` - A vector of entities to create
    /// * `audit_log_id` - The UUID of the audit log for tracking this operation
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of created entities with generated fields populated
    /// * `Err` - An error if the transaction could not be executed
    async fn create_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
