use thiserror::Error;

/// Errors raised while building a recurrence rule from stored or submitted fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("monthly_weekday recurrence requires {0}")]
    MissingMonthlyField(&'static str),

    #[error("Invalid week of month: {0} (expected 1-5)")]
    InvalidMonthlyWeek(i32),

    #[error("Invalid weekday: {0} (expected 0-6, Sunday = 0)")]
    InvalidWeekday(i32),
}

pub type CalendarResult<T> = std::result::Result<T, CalendarError>;
