use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::pattern::Recurrence;

/// Recurrence definition attached to a master event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRule {
    /// Id of the master event every generated instance points back to.
    pub master_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub recurrence: Recurrence,
    /// Zone whose wall clock the steps are computed in.
    pub timezone: Tz,
}

impl EventRule {
    #[must_use]
    pub fn new(
        master_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        recurrence: Recurrence,
        timezone: Tz,
    ) -> Self {
        Self {
            master_id: master_id.into(),
            start,
            end,
            recurrence,
            timezone,
        }
    }

    /// Length of one occurrence. Negative when `end` precedes `start`; the rule is
    /// expanded as given.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}
