use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;
use uuid::Uuid;

use crate::models::Versioned;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// This provides a stable hash across different runs and systems by:
/// - Serializing the data to CBOR format (deterministic binary representation)
/// - Using XxHash64 with a fixed seed (0) for consistent hashing
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Stamps a new entity with its first audit log id and hash.
pub fn stamp_created<T: Versioned>(item: &mut T, audit_log_id: Uuid) -> Result<(), String> {
    item.set_version(0, Some(audit_log_id));
    let hash = hash_as_i64(item)?;
    item.set_version(hash, Some(audit_log_id));
    Ok(())
}

/// Re-stamps a modified entity for an update.
///
/// Returns `Ok(false)` when the content still matches the hash it was loaded with,
/// in which case the entity is left untouched and must not be written.
pub fn stamp_updated<T: Versioned>(item: &mut T, audit_log_id: Uuid) -> Result<bool, String> {
    let previous_hash = item.get_hash();
    let mut entity_for_hashing = item.clone();
    entity_for_hashing.set_version(0, item.get_audit_log_id());
    if hash_as_i64(&entity_for_hashing)? == previous_hash {
        return Ok(false);
    }

    item.set_version(0, Some(audit_log_id));
    let hash = hash_as_i64(item)?;
    item.set_version(hash, Some(audit_log_id));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemStatus, UserModel};
    use heapless::String as HeaplessString;

    fn user() -> UserModel {
        UserModel {
            id: Uuid::new_v4(),
            employee_id: HeaplessString::try_from("EMP-001").unwrap(),
            name: HeaplessString::try_from("Dana Cruz").unwrap(),
            company: HeaplessString::try_from("Acme").unwrap(),
            department: HeaplessString::try_from("Finance").unwrap(),
            designation: None,
            hash: 0,
            audit_log_id: None,
        }
    }

    #[test]
    fn test_hash_is_stable() {
        let status = ItemStatus::Active;
        assert_eq!(hash_as_i64(&status).unwrap(), hash_as_i64(&status).unwrap());
        assert_ne!(
            hash_as_i64(&ItemStatus::Active).unwrap(),
            hash_as_i64(&ItemStatus::Inactive).unwrap()
        );
    }

    #[test]
    fn test_unchanged_entity_is_not_restamped() {
        let mut user = user();
        let first_audit = Uuid::new_v4();
        stamp_created(&mut user, first_audit).unwrap();
        let created_hash = user.hash;
        assert_ne!(created_hash, 0);

        assert!(!stamp_updated(&mut user, Uuid::new_v4()).unwrap());
        assert_eq!(user.hash, created_hash);
        assert_eq!(user.audit_log_id, Some(first_audit));

        user.department = HeaplessString::try_from("Logistics").unwrap();
        let second_audit = Uuid::new_v4();
        assert!(stamp_updated(&mut user, second_audit).unwrap());
        assert_ne!(user.hash, created_hash);
        assert_eq!(user.audit_log_id, Some(second_audit));
    }
}
