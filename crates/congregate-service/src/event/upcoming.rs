//! The upcoming-events view: one entry per logical event.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use congregate_calendar::resolve_next;
use congregate_db::model::event::EventRecord;

/// ## Summary
/// Groups events by [`EventRecord::series_key`].
///
/// Groups appear in the order their first member appears in `events`, and each
/// group keeps the relative order of its members.
#[must_use]
pub fn group_by_series(events: Vec<EventRecord>) -> Vec<Vec<EventRecord>> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<EventRecord>> = Vec::new();

    for event in events {
        let key = event.series_key();
        if let Some(&position) = positions.get(&key) {
            groups[position].push(event);
        } else {
            positions.insert(key, groups.len());
            groups.push(vec![event]);
        }
    }

    groups
}

/// ## Summary
/// Collapses ascending events into one entry per logical event, each resolved to
/// its next occurrence on or after `now`.
#[must_use]
pub fn resolve_upcoming(events: Vec<EventRecord>, now: DateTime<Utc>, timezone: Tz) -> Vec<EventRecord> {
    group_by_series(events)
        .iter()
        .filter_map(|group| resolve_next(group, now, timezone))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use congregate_calendar::Recurrence;
    use congregate_core::types::OrganizationId;
    use congregate_db::db::enums::AttendanceType;
    use congregate_db::model::event::NewEvent;
    use congregate_db::model::volunteer::VolunteerRoles;

    fn event(id: &str, title: &str, day: u32, recurrence: Option<Recurrence>) -> EventRecord {
        let start = Utc.with_ymd_and_hms(2024, 3, day, 17, 0, 0).unwrap();
        EventRecord::from_new(
            OrganizationId(uuid::Uuid::nil()),
            NewEvent {
                id: id.to_string(),
                title: title.to_string(),
                description: None,
                start_date: start,
                end_date: start + TimeDelta::hours(2),
                location: None,
                url: None,
                recurrence,
                allow_rsvp: true,
                attendance_type: AttendanceType::Rsvp,
                event_type: "Fellowship".to_string(),
                needs_volunteers: false,
                volunteer_roles: VolunteerRoles::None,
                is_master: false,
                parent_event_id: None,
            },
            start,
        )
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let groups = group_by_series(vec![
            event("a1", "Youth Night", 1, Some(Recurrence::Weekly)),
            event("b", "Potluck", 2, None),
            event("a2", "Youth Night", 8, Some(Recurrence::Weekly)),
            event("c", "Youth Night", 9, None),
        ]);

        let ids: Vec<Vec<&str>> = groups
            .iter()
            .map(|group| group.iter().map(|e| e.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["a1", "a2"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn recurring_group_collapses_to_next_occurrence() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let resolved = resolve_upcoming(
            vec![
                event("a1", "Youth Night", 1, Some(Recurrence::Weekly)),
                event("a2", "Youth Night", 8, Some(Recurrence::Weekly)),
                event("b", "Potluck", 2, None),
            ],
            now,
            Tz::UTC,
        );

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id, "a1");
        assert_eq!(
            resolved[0].start_date,
            Utc.with_ymd_and_hms(2024, 3, 15, 17, 0, 0).unwrap()
        );
        assert_eq!(resolved[0].end_date - resolved[0].start_date, TimeDelta::hours(2));
        assert_eq!(resolved[1].id, "b");
        assert_eq!(resolved[1].start_date, Utc.with_ymd_and_hms(2024, 3, 2, 17, 0, 0).unwrap());
    }
}
