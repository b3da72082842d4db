//! Single-step date arithmetic shared by the expander and the resolver.
//!
//! Steps operate on the local wall clock of the series' timezone so that the
//! time of day survives DST transitions. Conversion back to UTC happens in
//! [`localize`].

use chrono::{DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::pattern::{MonthlyWeek, Recurrence};

/// Months scanned by a `monthly_weekday` step before giving up.
const MAX_MONTH_SCAN: usize = 12;

/// ## Summary
/// Advances `cursor` by one occurrence of `recurrence`.
///
/// The result is always strictly later than `cursor`. Returns `None` only when
/// the calendar range supported by chrono is exhausted.
#[must_use]
pub fn advance(cursor: NaiveDateTime, recurrence: &Recurrence) -> Option<NaiveDateTime> {
    match recurrence {
        Recurrence::Daily => cursor.checked_add_signed(Duration::days(1)),
        Recurrence::Weekly | Recurrence::Unrecognized(_) => {
            cursor.checked_add_signed(Duration::days(7))
        }
        Recurrence::Biweekly => cursor.checked_add_signed(Duration::days(14)),
        Recurrence::Monthly => cursor.checked_add_months(Months::new(1)),
        Recurrence::MonthlyWeekday { week, weekday } => {
            advance_monthly_weekday(cursor, *week, *weekday)
        }
    }
}

/// Moves to the target weekday of the month following `cursor`, keeping the time
/// of day. A candidate that would not advance past `cursor` is skipped in favour
/// of the next month.
fn advance_monthly_weekday(
    cursor: NaiveDateTime,
    week: MonthlyWeek,
    weekday: Weekday,
) -> Option<NaiveDateTime> {
    let mut month_start = first_of_next_month(cursor.date())?;
    for _ in 0..MAX_MONTH_SCAN {
        let candidate = weekday_in_month(month_start, week, weekday)?.and_time(cursor.time());
        if candidate > cursor {
            return Some(candidate);
        }
        tracing::trace!(%candidate, %cursor, "monthly_weekday candidate did not advance");
        month_start = first_of_next_month(month_start)?;
    }
    None
}

/// ## Summary
/// First day of the month after the one containing `date`.
#[must_use]
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))
}

/// ## Summary
/// Date of the `week`-th `weekday` in the month starting at `month_start`.
///
/// `MonthlyWeek::Last` walks back from the final day of the month; the others
/// walk forward from the first matching weekday in whole weeks.
#[must_use]
pub fn weekday_in_month(
    month_start: NaiveDate,
    week: MonthlyWeek,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let target = weekday.num_days_from_sunday();
    match week {
        MonthlyWeek::Last => {
            let last_day = first_of_next_month(month_start)?.pred_opt()?;
            let back = (last_day.weekday().num_days_from_sunday() + 7 - target) % 7;
            last_day.checked_sub_signed(Duration::days(i64::from(back)))
        }
        nth => {
            let forward = (target + 7 - month_start.weekday().num_days_from_sunday()) % 7;
            let weeks = i64::from(nth.index() - 1);
            month_start.checked_add_signed(Duration::days(i64::from(forward) + weeks * 7))
        }
    }
}

/// ## Summary
/// Converts a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times inside a
/// DST gap are moved forward by the gap's usual hour.
#[must_use]
pub fn localize(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = local.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

/// Wall-clock time of `instant` in `tz`.
#[must_use]
pub fn wall_clock(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).expect("valid time")
    }

    #[test]
    fn fixed_steps() {
        let start = at(2024, 1, 1, 10);
        assert_eq!(advance(start, &Recurrence::Daily), Some(at(2024, 1, 2, 10)));
        assert_eq!(advance(start, &Recurrence::Weekly), Some(at(2024, 1, 8, 10)));
        assert_eq!(advance(start, &Recurrence::Biweekly), Some(at(2024, 1, 15, 10)));
        assert_eq!(
            advance(start, &Recurrence::Unrecognized("fortnightly".into())),
            Some(at(2024, 1, 8, 10))
        );
    }

    #[test]
    fn monthly_clamps_to_month_end() {
        assert_eq!(
            advance(at(2024, 1, 31, 9), &Recurrence::Monthly),
            Some(at(2024, 2, 29, 9))
        );
        assert_eq!(
            advance(at(2023, 1, 31, 9), &Recurrence::Monthly),
            Some(at(2023, 2, 28, 9))
        );
    }

    #[test]
    fn last_friday_of_following_month() {
        let recurrence = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Last,
            weekday: Weekday::Fri,
        };
        // Feb 2024 ends on Thursday the 29th.
        assert_eq!(advance(at(2024, 1, 5, 19), &recurrence), Some(at(2024, 2, 23, 19)));
        // Mar 2024 ends on Sunday the 31st.
        assert_eq!(advance(at(2024, 2, 23, 19), &recurrence), Some(at(2024, 3, 29, 19)));
        // Month ending exactly on the target weekday.
        assert_eq!(advance(at(2024, 4, 1, 19), &recurrence), Some(at(2024, 5, 31, 19)));
    }

    #[test]
    fn nth_weekday_of_following_month() {
        let first_sunday = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::First,
            weekday: Weekday::Sun,
        };
        assert_eq!(advance(at(2024, 1, 20, 10), &first_sunday), Some(at(2024, 2, 4, 10)));

        let third_wednesday = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Third,
            weekday: Weekday::Wed,
        };
        // Mar 1 2024 is a Friday: first Wednesday is the 6th, third the 20th.
        assert_eq!(
            advance(at(2024, 2, 21, 18), &third_wednesday),
            Some(at(2024, 3, 20, 18))
        );
    }

    #[test]
    fn monthly_weekday_from_late_month_cursor_does_not_skip_february() {
        let second_tuesday = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Second,
            weekday: Weekday::Tue,
        };
        assert_eq!(
            advance(at(2024, 1, 31, 7), &second_tuesday),
            Some(at(2024, 2, 13, 7))
        );
    }

    #[test]
    fn monthly_weekday_is_strictly_monotonic() {
        let recurrence = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Fourth,
            weekday: Weekday::Mon,
        };
        let mut cursor = at(2024, 1, 31, 23);
        for _ in 0..36 {
            let next = advance(cursor, &recurrence).expect("in range");
            assert!(next > cursor);
            cursor = next;
        }
    }

    #[test]
    fn weekday_in_month_handles_month_starting_on_target() {
        // Sep 1 2024 is a Sunday.
        assert_eq!(
            weekday_in_month(date(2024, 9, 1), MonthlyWeek::First, Weekday::Sun),
            Some(date(2024, 9, 1))
        );
        assert_eq!(
            weekday_in_month(date(2024, 9, 1), MonthlyWeek::Fourth, Weekday::Sun),
            Some(date(2024, 9, 22))
        );
        assert_eq!(
            weekday_in_month(date(2024, 9, 1), MonthlyWeek::Last, Weekday::Sun),
            Some(date(2024, 9, 29))
        );
    }

    #[test]
    fn localize_keeps_wall_clock_across_dst() {
        let chicago = chrono_tz::America::Chicago;
        let before = localize(at(2024, 3, 3, 10), chicago).expect("valid");
        let after = localize(at(2024, 3, 10, 10), chicago).expect("valid");
        assert_eq!(before.to_rfc3339(), "2024-03-03T16:00:00+00:00");
        assert_eq!(after.to_rfc3339(), "2024-03-10T15:00:00+00:00");
    }

    #[test]
    fn localize_moves_out_of_dst_gap() {
        let chicago = chrono_tz::America::Chicago;
        let shifted = localize(at(2024, 3, 10, 2), chicago).expect("valid");
        assert_eq!(shifted.to_rfc3339(), "2024-03-10T08:00:00+00:00");
    }

    #[test]
    fn wall_clock_round_trips_through_localize() {
        let tz = chrono_tz::Europe::Berlin;
        let local = at(2024, 7, 14, 11);
        let utc = localize(local, tz).expect("valid");
        assert_eq!(wall_clock(utc, tz), local);
    }
}
