use thiserror::Error;

use congregate_calendar::CalendarError;
use congregate_db::error::DbError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(DbError),

    #[error(transparent)]
    CoreError(#[from] congregate_core::error::CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(message) => Self::Conflict(message),
            DbError::MissingReference(message) => Self::NotFound(message),
            other => Self::DatabaseError(other),
        }
    }
}

/// Rule errors only arise from submitted fields.
impl From<CalendarError> for ServiceError {
    fn from(err: CalendarError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
