use thiserror::Error;

/// Errors raised while loading or checking settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{key} must be at least {min}, got {value}")]
    OutOfRange {
        key: &'static str,
        min: u32,
        value: u32,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
