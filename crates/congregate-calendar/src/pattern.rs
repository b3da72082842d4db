//! Recurrence patterns as stored on event rows.

use chrono::Weekday;

use crate::error::{CalendarError, CalendarResult};

/// Which occurrence of a weekday inside a month a `monthly_weekday` rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthlyWeek {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl MonthlyWeek {
    /// ## Summary
    /// Maps the stored 1-5 index, where 5 means "last".
    ///
    /// ## Errors
    /// Returns `CalendarError::InvalidMonthlyWeek` outside 1-5.
    pub const fn from_index(index: i32) -> CalendarResult<Self> {
        match index {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            4 => Ok(Self::Fourth),
            5 => Ok(Self::Last),
            other => Err(CalendarError::InvalidMonthlyWeek(other)),
        }
    }

    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Last => 5,
        }
    }
}

/// ## Summary
/// Maps a Sunday-based weekday index (0 = Sunday .. 6 = Saturday).
///
/// ## Errors
/// Returns `CalendarError::InvalidWeekday` outside 0-6.
pub const fn weekday_from_index(index: i32) -> CalendarResult<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(CalendarError::InvalidWeekday(other)),
    }
}

/// How a recurring series advances from one occurrence to the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recurrence {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    MonthlyWeekday { week: MonthlyWeek, weekday: Weekday },
    /// A stored pattern this version does not know. Steps weekly.
    Unrecognized(String),
}

impl Recurrence {
    /// ## Summary
    /// Builds a recurrence from the stored pattern name and monthly fields.
    ///
    /// Unknown pattern names are kept as `Unrecognized` rather than rejected.
    ///
    /// ## Errors
    /// Returns an error if `pattern` is `monthly_weekday` and the week or weekday is
    /// missing or out of range.
    pub fn from_parts(
        pattern: &str,
        monthly_week: Option<i32>,
        monthly_weekday: Option<i32>,
    ) -> CalendarResult<Self> {
        Ok(match pattern {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "biweekly" => Self::Biweekly,
            "monthly" => Self::Monthly,
            "monthly_weekday" => {
                let week = monthly_week.ok_or(CalendarError::MissingMonthlyField("monthly_week"))?;
                let weekday =
                    monthly_weekday.ok_or(CalendarError::MissingMonthlyField("monthly_weekday"))?;
                Self::MonthlyWeekday {
                    week: MonthlyWeek::from_index(week)?,
                    weekday: weekday_from_index(weekday)?,
                }
            }
            other => Self::Unrecognized(other.to_string()),
        })
    }

    /// Stored pattern name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::MonthlyWeekday { .. } => "monthly_weekday",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Stored `monthly_week` column value.
    #[must_use]
    pub const fn monthly_week(&self) -> Option<i32> {
        match self {
            Self::MonthlyWeekday { week, .. } => Some(week.index()),
            _ => None,
        }
    }

    /// Stored `monthly_weekday` column value (Sunday = 0).
    #[must_use]
    pub fn monthly_weekday(&self) -> Option<i32> {
        match self {
            Self::MonthlyWeekday { weekday, .. } => {
                i32::try_from(weekday.num_days_from_sunday()).ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
