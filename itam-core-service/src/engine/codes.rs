use heapless::String as HeaplessString;
use itam_core_api::ApiResult;
use itam_core_db::models::CodeFamily;
use itam_core_db::repository::CodeSequence;

use super::text::bounded;
use crate::error::storage_error;

/// Issues the next code of a family from the session's counter
///
/// The increment belongs to the caller's transaction, so a code is consumed only
/// if the operation commits.
pub async fn next_code<C>(codes: &C, family: CodeFamily) -> ApiResult<HeaplessString<20>>
where
    C: CodeSequence + ?Sized,
{
    let value = codes.next_value(family).await.map_err(storage_error)?;
    bounded(&family.format(value), family.prefix())
}
