use thiserror::Error;
use uuid::Uuid;

/// Raised by stores when a row changed or was locked by another transaction.
///
/// Travels inside the `Box<dyn Error + Send + Sync>` returned by repository traits;
/// callers downcast to tell a retryable conflict from a fatal storage failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConcurrentUpdateError {
    #[error("Concurrent update detected on {entity} {id}")]
    StaleVersion { entity: String, id: Uuid },

    #[error("Lock not acquired: {0}")]
    LockNotAcquired(String),
}

/// True if the boxed repository error is a concurrency conflict.
pub fn is_concurrent_update(error: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    error.downcast_ref::<ConcurrentUpdateError>().is_some()
}
