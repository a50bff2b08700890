use async_trait::async_trait;

use crate::models::identifiable::Identifiable;
use super::pagination::{Page, PageRequest};

/// Repository trait listing items that have no owner and are not deleted
///
/// # Type Parameters
/// * `T` - `AssetModel` or `ComputerModel`
///
/// # Example
/// ```ignore
/// let page = repo.find_vacant(PageRequest::new(20, 0)).await?;
/// for asset in page.items { /* offer for assignment */ }
/// ```
#[async_trait]
pub trait FindVacant<T: Identifiable>: Send + Sync {
    /// Items are ordered by id so paging is stable
    async fn find_vacant(
        &self,
        page: PageRequest,
    ) -> Result<Page<T>, Box<dyn std::error::Error + Send + Sync>>;
}
