//! Bulk generation of concrete instances from a recurring master.

use chrono::{DateTime, Months, SecondsFormat, TimeDelta, Utc};
use congregate_core::util::slug::generate_slug;

use crate::rule::EventRule;
use crate::step::{advance, localize, wall_clock};

/// One concrete occurrence of a recurring master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInstance {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub parent_event_id: String,
}

impl EventInstance {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}

/// ## Summary
/// Derives the id of the instance of `master_id` starting at `start`.
///
/// The id is the slug of the master id followed by the millisecond-precision
/// ISO-8601 UTC timestamp, e.g. `sunday-service-2024-01-07t10-00-00-000z`.
#[must_use]
pub fn instance_id(master_id: &str, start: DateTime<Utc>) -> String {
    generate_slug(&format!(
        "{master_id}-{}",
        start.to_rfc3339_opts(SecondsFormat::Millis, true)
    ))
}

/// ## Summary
/// End of the generation window starting at `now`.
///
/// Saturates at the latest representable instant.
#[must_use]
pub fn horizon_end(now: DateTime<Utc>, years: u32) -> DateTime<Utc> {
    now.checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// ## Summary
/// Expands `rule` into every instance whose start falls on or before `horizon_end`.
///
/// The first instance starts at `rule.start`; each following one is one step of
/// the rule's recurrence later. Every instance keeps the rule's duration. The
/// result is empty when `rule.start` is already past the horizon.
#[must_use]
#[tracing::instrument(skip(rule, horizon_end), fields(
    master_id = %rule.master_id,
    pattern = %rule.recurrence,
    timezone = %rule.timezone,
    horizon = %horizon_end
))]
pub fn expand(rule: &EventRule, horizon_end: DateTime<Utc>) -> Vec<EventInstance> {
    if !rule.recurrence.is_recognized() {
        tracing::debug!("Unrecognized recurrence pattern, stepping weekly");
    }

    let duration = rule.duration();
    let mut instances = Vec::new();
    let mut local = wall_clock(rule.start, rule.timezone);
    let mut start = rule.start;

    while start <= horizon_end {
        instances.push(EventInstance {
            id: instance_id(&rule.master_id, start),
            start,
            end: start + duration,
            parent_event_id: rule.master_id.clone(),
        });

        let Some(next_local) = advance(local, &rule.recurrence) else {
            tracing::warn!(%local, "Calendar range exhausted during expansion");
            break;
        };
        let Some(next_start) = localize(next_local, rule.timezone) else {
            tracing::warn!(%next_local, "Could not map wall-clock time to UTC");
            break;
        };
        local = next_local;
        start = next_start;
    }

    tracing::debug!(count = instances.len(), "Expanded recurring event");
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{MonthlyWeek, Recurrence};
    use chrono::{TimeZone, Weekday};
    use chrono_tz::Tz;
    use rrule::RRuleSet;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn rule(recurrence: Recurrence, start: DateTime<Utc>, hours: i64) -> EventRule {
        EventRule::new(
            "bible-study-1704103200000",
            start,
            start + TimeDelta::hours(hours),
            recurrence,
            Tz::UTC,
        )
    }

    #[test_log::test]
    fn every_recognized_pattern_yields_instances() {
        let start = utc(2024, 1, 1, 10);
        let horizon = horizon_end(start, 1);
        for recurrence in [
            Recurrence::Daily,
            Recurrence::Weekly,
            Recurrence::Biweekly,
            Recurrence::Monthly,
            Recurrence::MonthlyWeekday {
                week: MonthlyWeek::Second,
                weekday: Weekday::Sun,
            },
        ] {
            let instances = expand(&rule(recurrence.clone(), start, 2), horizon);
            assert!(!instances.is_empty(), "{recurrence} produced nothing");
            assert_eq!(instances[0].start, start);
            assert!(
                instances.windows(2).all(|pair| pair[0].start < pair[1].start),
                "{recurrence} not strictly increasing"
            );
            assert!(instances.iter().all(|instance| instance.start <= horizon));
            assert!(
                instances
                    .iter()
                    .all(|instance| instance.duration() == TimeDelta::hours(2))
            );
        }
    }

    #[test]
    fn instance_ids_are_slugged_and_distinct() {
        let instances = expand(&rule(Recurrence::Daily, utc(2024, 1, 1, 10), 1), utc(2024, 12, 31, 23));
        assert_eq!(
            instances[0].id,
            "bible-study-1704103200000-2024-01-01t10-00-00-000z"
        );
        let mut ids: Vec<&str> = instances.iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), instances.len());
        assert!(
            instances
                .iter()
                .all(|i| i.parent_event_id == "bible-study-1704103200000")
        );
    }

    #[test]
    fn instance_id_is_idempotent_under_slugging() {
        let id = instance_id("Bible Study", utc(2024, 1, 7, 10));
        assert_eq!(id, "bible-study-2024-01-07t10-00-00-000z");
        assert_eq!(generate_slug(&id), id);
    }

    #[test]
    fn daily_from_horizon_anchor_includes_the_anniversary() {
        let start = utc(2024, 1, 1, 10);
        let horizon = horizon_end(start, 1);
        let instances = expand(&rule(Recurrence::Daily, start, 1), horizon);
        // 366 days of 2024 plus 2025-01-01 itself.
        assert_eq!(instances.len(), 367);
        assert_eq!(instances.last().map(|i| i.start), Some(horizon));
    }

    #[test]
    fn start_past_horizon_is_empty() {
        let instances = expand(&rule(Recurrence::Weekly, utc(2024, 6, 1, 10), 1), utc(2024, 5, 1, 0));
        assert!(instances.is_empty());
    }

    #[test]
    fn negative_duration_is_preserved() {
        let start = utc(2024, 1, 1, 10);
        let backwards = EventRule::new("m", start, start - TimeDelta::hours(1), Recurrence::Weekly, Tz::UTC);
        let instances = expand(&backwards, utc(2024, 2, 1, 0));
        assert!(
            instances
                .iter()
                .all(|i| i.duration() == TimeDelta::hours(-1))
        );
    }

    #[test]
    fn horizon_end_adds_calendar_years() {
        assert_eq!(horizon_end(utc(2024, 2, 29, 12), 1), utc(2025, 2, 28, 12));
        assert_eq!(horizon_end(utc(2024, 1, 1, 0), 2), utc(2026, 1, 1, 0));
    }

    #[test]
    fn second_tuesday_matches_rfc5545_expansion() {
        let start = utc(2024, 1, 9, 10);
        let recurrence = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Second,
            weekday: Weekday::Tue,
        };
        let ours: Vec<i64> = expand(&rule(recurrence, start, 1), utc(2024, 12, 31, 0))
            .iter()
            .map(|i| i.start.timestamp())
            .collect();

        let rrule_set: RRuleSet = "DTSTART:20240109T100000Z\nRRULE:FREQ=MONTHLY;COUNT=12;BYDAY=2TU"
            .parse()
            .expect("valid rrule");
        let reference: Vec<i64> = rrule_set
            .all(100)
            .dates
            .iter()
            .map(chrono::DateTime::timestamp)
            .collect();

        assert_eq!(ours, reference);
    }

    #[test]
    fn last_friday_matches_rfc5545_expansion() {
        let start = utc(2024, 1, 26, 19);
        let recurrence = Recurrence::MonthlyWeekday {
            week: MonthlyWeek::Last,
            weekday: Weekday::Fri,
        };
        let ours: Vec<i64> = expand(&rule(recurrence, start, 1), utc(2024, 12, 31, 0))
            .iter()
            .map(|i| i.start.timestamp())
            .collect();

        let rrule_set: RRuleSet = "DTSTART:20240126T190000Z\nRRULE:FREQ=MONTHLY;COUNT=12;BYDAY=-1FR"
            .parse()
            .expect("valid rrule");
        let reference: Vec<i64> = rrule_set
            .all(100)
            .dates
            .iter()
            .map(chrono::DateTime::timestamp)
            .collect();

        assert_eq!(ours, reference);
    }

    #[test]
    fn weekly_in_local_zone_keeps_time_of_day() {
        let chicago = chrono_tz::America::Chicago;
        let start = utc(2024, 3, 3, 16); // 10:00 CST
        let weekly = EventRule::new("m", start, start + TimeDelta::hours(1), Recurrence::Weekly, chicago);
        let instances = expand(&weekly, utc(2024, 3, 18, 0));
        let local_hours: Vec<String> = instances
            .iter()
            .map(|i| i.start.with_timezone(&chicago).format("%m-%d %H:%M").to_string())
            .collect();
        assert_eq!(local_hours, ["03-03 10:00", "03-10 10:00", "03-17 10:00"]);
        assert_eq!(instances[1].start, utc(2024, 3, 10, 15));
    }
}
