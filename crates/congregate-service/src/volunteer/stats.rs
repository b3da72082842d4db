//! The volunteer overview.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use congregate_db::model::assignment::VolunteerAssignment;
use congregate_db::model::event::EventRecord;

/// Assignments whose event starts within this many days count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;
/// Assignments made within this many days count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// Number of events needing volunteers listed in the overview.
pub const NEEDS_PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct VolunteerStats {
    /// Distinct members with at least one assignment.
    pub total_volunteers: usize,
    /// Assignments whose event starts between now and the upcoming window's end.
    pub upcoming_volunteers: usize,
    pub recent_volunteers: usize,
    /// Upcoming events flagged as needing volunteers.
    pub events_needing_volunteers: usize,
    /// The first few of those, in ascending start order.
    pub upcoming_events_with_volunteers: Vec<EventRecord>,
    pub all_volunteers: Vec<VolunteerAssignment>,
}

impl VolunteerStats {
    /// ## Summary
    /// Builds the overview from every assignment of an organization and its
    /// upcoming events that need volunteers, as of `now`.
    #[must_use]
    pub fn compute(
        assignments: Vec<VolunteerAssignment>,
        mut needing: Vec<EventRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        let upcoming_end = now + TimeDelta::days(UPCOMING_WINDOW_DAYS);
        let recent_start = now - TimeDelta::days(RECENT_WINDOW_DAYS);

        let members: HashSet<_> = assignments.iter().map(|a| a.volunteer.member_id).collect();
        let upcoming_volunteers = assignments
            .iter()
            .filter(|a| (now..=upcoming_end).contains(&a.event.start_date))
            .count();
        let recent_volunteers = assignments
            .iter()
            .filter(|a| a.volunteer.created_at >= recent_start)
            .count();

        let events_needing_volunteers = needing.len();
        needing.truncate(NEEDS_PREVIEW_LEN);

        Self {
            total_volunteers: members.len(),
            upcoming_volunteers,
            recent_volunteers,
            events_needing_volunteers,
            upcoming_events_with_volunteers: needing,
            all_volunteers: assignments,
        }
    }
}
