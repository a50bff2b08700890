use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for loading entities and holding them exclusively
/// until the enclosing unit of work ends
///
/// Every row an engine operation is about to mutate is read through this trait, so
/// two operations touching the same asset, computer or record run one after the other.
/// Implementations acquire the locks in id order to avoid deadlocks between batches.
///
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl LockBatch<ComputerModel> for ComputerRepositoryImpl {
///     async fn lock_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<ComputerModel>>, Box<dyn Error + Send + Sync>> {
///         // SELECT ... FOR UPDATE
///     }
/// }
/// ```
#[async_trait]
pub trait LockBatch<T: Identifiable>: Send + Sync {
    /// Lock multiple entities by their unique identifiers
    ///
    /// # Returns
    /// * `Ok(Vec<Option<T>>)` - Entities in the same order as the provided IDs, None when absent
    /// * `Err` - An error if the rows could not be locked; a lock timeout surfaces as
    ///   [`crate::ConcurrentUpdateError`]
    async fn lock_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<T>>, Box<dyn std::error::Error + Send + Sync>>;
}
