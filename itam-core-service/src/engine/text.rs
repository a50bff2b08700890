use heapless::String as HeaplessString;
use itam_core_api::{ApiError, ApiResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest cost a `NUMERIC(15, 2)` column holds, in cents
const MAX_COST_CENTS: i64 = 999_999_999_999_999;

/// Copies `value` into a fixed-capacity string, rejecting input that does not fit
pub fn bounded<const N: usize>(value: &str, field: &str) -> ApiResult<HeaplessString<N>> {
    HeaplessString::try_from(value)
        .map_err(|_| ApiError::Validation(format!("{field} exceeds {N} bytes")))
}

pub fn bounded_opt<const N: usize>(
    value: Option<&str>,
    field: &str,
) -> ApiResult<Option<HeaplessString<N>>> {
    value.map(|value| bounded(value, field)).transpose()
}

/// Rounds a cost to cents with a fixed scale of 2, so a stored cost reads back
/// with the same representation and the row hash stays stable
pub fn money(value: Option<Decimal>, field: &str) -> ApiResult<Option<Decimal>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let mut cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    if cents.is_sign_negative() || cents > Decimal::new(MAX_COST_CENTS, 2) {
        return Err(ApiError::Validation(format!("{field} is out of range")));
    }
    Ok(Some(cents))
}
