use async_trait::async_trait;

use crate::models::CodeFamily;

/// Atomic counter per code family
///
/// `next_value` increments and returns the counter in one step inside the session's
/// transaction; the increment is discarded if the session rolls back, so an aborted
/// operation never consumes a code.
#[async_trait]
pub trait CodeSequence: Send + Sync {
    /// # Returns
    /// * `Ok(value)` - Strictly greater than every value previously committed for `family`
    /// * `Err` - The counter could not be incremented; the enclosing operation must abort
    async fn next_value(
        &self,
        family: CodeFamily,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>>;
}
