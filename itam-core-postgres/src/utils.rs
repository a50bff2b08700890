use heapless::String as HeaplessString;
use chrono::NaiveDate;
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::{ApprovalStamp, Identifiable};
use itam_core_db::ConcurrentUpdateError;
use sqlx::{postgres::PgRow, Row};
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use uuid::Uuid;

use crate::executor::Executor;

/// serialization_failure, deadlock_detected, lock_not_available, unique_violation
const RETRYABLE_SQLSTATES: [&str; 4] = ["40001", "40P01", "55P03", "23505"];

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| {
        format!("Value for column '{col_name}' is too long (max {N} chars)").into()
    })
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| {
            format!("Value for column '{col_name}' is too long (max {N} chars)").into()
        })
}

/// Reads an approval stage stored as a `<stage>_by` / `<stage>_on` column pair
pub fn get_approval_stamp(
    row: &PgRow,
    stage: &str,
) -> Result<Option<ApprovalStamp>, Box<dyn Error + Send + Sync>> {
    let user_id: Option<Uuid> = row.try_get(format!("{stage}_by").as_str())?;
    let date: Option<NaiveDate> = row.try_get(format!("{stage}_on").as_str())?;
    match (user_id, date) {
        (Some(user_id), Some(date)) => Ok(Some(ApprovalStamp { user_id, date })),
        (None, None) => Ok(None),
        _ => Err(format!("Approval stage '{stage}' is half filled").into()),
    }
}

/// Boxes a database error, turning lock, serialization and uniqueness
/// conflicts into a retryable `ConcurrentUpdateError`
pub fn db_error(error: sqlx::Error) -> Box<dyn Error + Send + Sync> {
    if let sqlx::Error::Database(db) = &error {
        if let Some(code) = db.code() {
            if RETRYABLE_SQLSTATES.contains(&code.as_ref()) {
                return Box::new(ConcurrentUpdateError::LockNotAcquired(format!(
                    "{} (SQLSTATE {code})",
                    db.message()
                )));
            }
        }
    }
    Box::new(error)
}

pub fn stale_version(entity_type: EntityType, id: Uuid) -> Box<dyn Error + Send + Sync> {
    Box::new(ConcurrentUpdateError::StaleVersion {
        entity: entity_type.to_string(),
        id,
    })
}

/// Runs a query taking the id list as `$1` inside the session's transaction
pub async fn fetch_by_ids(
    executor: &Executor,
    query: &str,
    ids: &[Uuid],
) -> Result<Vec<PgRow>, Box<dyn Error + Send + Sync>> {
    let mut tx = executor.tx.lock().await;
    let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
    sqlx::query(query)
        .bind(ids)
        .fetch_all(&mut **transaction)
        .await
        .map_err(db_error)
}

/// Lines loaded items up with the requested ids; unknown ids become `None`
pub fn in_id_order<T: Identifiable>(items: Vec<T>, ids: &[Uuid]) -> Vec<Option<T>> {
    let mut item_map: HashMap<Uuid, T> = items
        .into_iter()
        .map(|item| (item.get_id(), item))
        .collect();
    ids.iter().map(|id| item_map.remove(id)).collect()
}

/// Positions for an ordered join table, in the order of `ids`
pub fn positions(ids: &[Uuid]) -> Vec<i32> {
    (0..ids.len() as i32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itam_core_db::is_concurrent_update;

    #[test]
    fn test_non_database_errors_are_not_retryable() {
        let err = db_error(sqlx::Error::RowNotFound);
        assert!(!is_concurrent_update(err.as_ref()));

        let err = stale_version(EntityType::Computer, Uuid::nil());
        assert!(is_concurrent_update(err.as_ref()));
    }

    #[test]
    fn test_positions_follow_order() {
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(positions(&ids), vec![0, 1, 2]);
        assert!(positions(&[]).is_empty());
    }
}
