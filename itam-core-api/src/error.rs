use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A referenced item, owner or record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A precondition of the operation does not hold
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A lock or version check failed; the caller may retry
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The transaction could not be completed; nothing was applied
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{entity} {id}"))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Concurrency(_))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = ApiError::not_found("Asset", id);
        assert_eq!(
            err.to_string(),
            format!("Not found: Asset {id}")
        );
    }

    #[test]
    fn test_only_concurrency_is_retryable() {
        assert!(ApiError::Concurrency("lock".into()).is_retryable());
        assert!(!ApiError::Storage("commit".into()).is_retryable());
        assert!(!ApiError::Conflict("owned".into()).is_retryable());
    }
}
