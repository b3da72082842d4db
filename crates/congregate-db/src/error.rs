use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Invalid stored value: {0}")]
    InvalidStoredValue(String),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
