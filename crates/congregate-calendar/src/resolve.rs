//! Display-time resolution of the next occurrence of a stored series.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::pattern::Recurrence;
use crate::step::{advance, localize, wall_clock};

/// A stored event that may belong to a recurring series.
pub trait SeriesOccurrence: Clone {
    fn starts_at(&self) -> DateTime<Utc>;

    fn ends_at(&self) -> DateTime<Utc>;

    /// `None` for one-off events.
    fn recurrence(&self) -> Option<Recurrence>;

    /// Copy of this event moved to a new span.
    #[must_use]
    fn with_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self;
}

/// ## Summary
/// Steps a series forward from `start` until it is no longer before `today`.
///
/// Returns the resulting `(start, end)` span with the original duration. A start
/// already on or after `today` is returned unchanged.
#[must_use]
pub fn next_occurrence(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    recurrence: &Recurrence,
    timezone: Tz,
    today: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let duration = end.signed_duration_since(start);
    let mut local = wall_clock(start, timezone);
    let mut cursor = start;

    while cursor < today {
        let Some(next) = advance(local, recurrence).and_then(|next_local| {
            localize(next_local, timezone).map(|next_utc| (next_local, next_utc))
        }) else {
            tracing::warn!(%cursor, "Could not step series forward, keeping last occurrence");
            break;
        };
        (local, cursor) = next;
    }

    (cursor, cursor + duration)
}

/// ## Summary
/// Resolves the occurrence of `series` to show for `today`.
///
/// `series` holds the stored events of one logical event in ascending start
/// order. A one-off event is returned as stored. For a recurring series the
/// earliest stored start is stepped forward with [`next_occurrence`]. Returns
/// `None` for an empty series.
#[must_use]
pub fn resolve_next<E: SeriesOccurrence>(series: &[E], today: DateTime<Utc>, timezone: Tz) -> Option<E> {
    let first = series.first()?;
    let Some(recurrence) = first.recurrence() else {
        return Some(first.clone());
    };

    if !recurrence.is_recognized() {
        tracing::trace!(pattern = %recurrence, "Unrecognized recurrence pattern, stepping weekly");
    }

    let (start, end) = next_occurrence(first.starts_at(), first.ends_at(), &recurrence, timezone, today);
    Some(first.with_span(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::MonthlyWeek;
    use chrono::{TimeDelta, TimeZone, Weekday};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Stored {
        title: &'static str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        recurrence: Option<Recurrence>,
    }

    impl SeriesOccurrence for Stored {
        fn starts_at(&self) -> DateTime<Utc> {
            self.start
        }

        fn ends_at(&self) -> DateTime<Utc> {
            self.end
        }

        fn recurrence(&self) -> Option<Recurrence> {
            self.recurrence.clone()
        }

        fn with_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
            Self {
                start,
                end,
                ..self.clone()
            }
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn stored(start: DateTime<Utc>, recurrence: Option<Recurrence>) -> Stored {
        Stored {
            title: "Prayer Meeting",
            start,
            end: start + TimeDelta::minutes(90),
            recurrence,
        }
    }

    #[test]
    fn weekly_series_resolves_to_next_week() {
        let series = [stored(utc(2024, 1, 1, 0), Some(Recurrence::Weekly))];
        let next = resolve_next(&series, utc(2024, 1, 20, 0), Tz::UTC).expect("non-empty");
        assert_eq!(next.start, utc(2024, 1, 22, 0));
        assert_eq!(next.end - next.start, TimeDelta::minutes(90));
        assert_eq!(next.title, "Prayer Meeting");
    }

    #[test]
    fn one_off_event_is_unchanged() {
        let event = stored(utc(2023, 5, 1, 9), None);
        let next = resolve_next(std::slice::from_ref(&event), utc(2024, 1, 20, 0), Tz::UTC);
        assert_eq!(next, Some(event));
    }

    #[test]
    fn empty_series_resolves_to_nothing() {
        let series: [Stored; 0] = [];
        assert_eq!(resolve_next(&series, utc(2024, 1, 20, 0), Tz::UTC), None);
    }

    #[test]
    fn future_start_is_kept() {
        let series = [stored(utc(2024, 2, 1, 18), Some(Recurrence::Daily))];
        let next = resolve_next(&series, utc(2024, 1, 20, 0), Tz::UTC).expect("non-empty");
        assert_eq!(next.start, utc(2024, 2, 1, 18));
    }

    #[test]
    fn start_equal_to_today_is_not_stepped() {
        let today = utc(2024, 1, 20, 0);
        let series = [stored(today, Some(Recurrence::Biweekly))];
        let next = resolve_next(&series, today, Tz::UTC).expect("non-empty");
        assert_eq!(next.start, today);
    }

    #[test]
    fn only_the_earliest_member_drives_resolution() {
        let series = [
            stored(utc(2024, 1, 3, 12), Some(Recurrence::Biweekly)),
            stored(utc(2024, 1, 17, 12), Some(Recurrence::Biweekly)),
        ];
        let next = resolve_next(&series, utc(2024, 2, 1, 0), Tz::UTC).expect("non-empty");
        assert_eq!(next.start, utc(2024, 2, 14, 12));
    }

    #[test]
    fn monthly_weekday_series_uses_weekday_rule() {
        let recurrence = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Last,
            weekday: Weekday::Fri,
        };
        let series = [stored(utc(2024, 1, 26, 19), Some(recurrence))];
        let next = resolve_next(&series, utc(2024, 3, 1, 0), Tz::UTC).expect("non-empty");
        assert_eq!(next.start, utc(2024, 3, 29, 19));
    }

    #[test]
    fn unrecognized_pattern_steps_weekly() {
        let series = [stored(
            utc(2024, 1, 1, 0),
            Some(Recurrence::Unrecognized("quarterly".to_string())),
        )];
        let next = resolve_next(&series, utc(2024, 1, 20, 0), Tz::UTC).expect("non-empty");
        assert_eq!(next.start, utc(2024, 1, 22, 0));
    }

    #[test]
    fn next_occurrence_keeps_negative_duration() {
        let (start, end) = next_occurrence(
            utc(2024, 1, 1, 10),
            utc(2024, 1, 1, 9),
            &Recurrence::Daily,
            Tz::UTC,
            utc(2024, 1, 3, 0),
        );
        assert_eq!(start, utc(2024, 1, 3, 10));
        assert_eq!(end, utc(2024, 1, 3, 9));
    }
}
