// ==========================================
// Emergency Device Management - API Error Types
// ==========================================
// Role: unified error surface for the API layer
// Mapping: repository and engine errors converge here
// ==========================================

use thiserror::Error;

use crate::engine::ValidationError;
use crate::repository::RepositoryError;

// ==========================================
// ApiError - API layer error
// ==========================================

/// API layer error.
///
/// Every API operation returns `ApiResult<T>`; callers match on the
/// variant to decide between "reject the request" and "fail the call".
#[derive(Debug, Error)]
pub enum ApiError {
    // ===== request rejection =====
    /// Inspection submission rejected by a validation rule
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request field is malformed or out of range
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Request conflicts with a persistence rule (duplicate key, missing reference)
    #[error("business rule violation: {0}")]
    BusinessRuleViolation(String),

    // ===== data access =====
    /// Query or statement execution failed
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Connection could not be opened or locked
    #[error("database connection error: {0}")]
    DatabaseConnectionError(String),

    // ===== generic =====
    /// Invariant broken inside the service itself
    #[error("internal error: {0}")]
    InternalError(String),

    /// Wrapped upstream error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result alias used by every API operation.
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// Error conversions
// ==========================================

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={}) does not exist", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => {
                ApiError::DatabaseConnectionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("database lock failed: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("unique constraint violated: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("foreign key violated: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field '{}': {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

// ==========================================
// Tests
// ==========================================
