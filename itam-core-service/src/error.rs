use itam_core_api::ApiError;
use itam_core_db::ConcurrentUpdateError;

/// Error type returned by every repository trait
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Maps a repository failure onto the API taxonomy.
///
/// Version and lock conflicts become `Concurrency` so the runner can retry them;
/// anything else aborts the operation as `Storage`.
pub fn storage_error(error: StoreError) -> ApiError {
    match error.downcast::<ConcurrentUpdateError>() {
        Ok(conflict) => ApiError::Concurrency(conflict.to_string()),
        Err(other) => ApiError::Storage(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_concurrent_update_is_retryable() {
        let err = storage_error(Box::new(ConcurrentUpdateError::StaleVersion {
            entity: "ASSET".to_string(),
            id: Uuid::nil(),
        }));
        assert!(matches!(err, ApiError::Concurrency(_)));
        assert!(err.is_retryable());

        let err = storage_error("connection reset".into());
        assert_eq!(err, ApiError::Storage("connection reset".to_string()));
    }
}
