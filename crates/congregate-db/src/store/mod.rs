//! The persistent stores the services run against.
//!
//! Every operation takes the caller's `OrganizationContext`; rows of other
//! organizations are invisible to it.

use std::future::Future;

use chrono::{DateTime, Utc};
use congregate_core::types::{MemberId, OrganizationContext};
use uuid::Uuid;

use crate::error::DbResult;
use crate::model::assignment::{EventVolunteer, NewVolunteer, VolunteerAssignment, VolunteerChanges};
use crate::model::attendance::{Attendance, MemberAttendance, NewAttendance};
use crate::model::event::{EventChanges, EventRecord, NewEvent};

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Filter for [`EventStore::list_events`]. Results are always in ascending start order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events starting at or after this instant.
    pub starting_from: Option<DateTime<Utc>>,
    /// Only events whose `needs_volunteers` flag matches.
    pub needs_volunteers: Option<bool>,
    pub limit: Option<usize>,
}

impl EventFilter {
    #[must_use]
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            starting_from: Some(now),
            ..Self::default()
        }
    }

    /// Whether `event` passes every criterion except `limit`.
    #[must_use]
    pub fn matches(&self, event: &EventRecord) -> bool {
        self.starting_from.is_none_or(|from| event.start_date >= from)
            && self
                .needs_volunteers
                .is_none_or(|needs| event.needs_volunteers == needs)
    }
}

/// Filter/sort/update operations over stored events.
pub trait EventStore: Send + Sync {
    /// Inserts events in one batch and returns them as stored.
    fn insert_events(
        &self,
        ctx: &OrganizationContext,
        events: &[NewEvent],
    ) -> impl Future<Output = DbResult<Vec<EventRecord>>> + Send;

    fn get_event(
        &self,
        ctx: &OrganizationContext,
        id: &str,
    ) -> impl Future<Output = DbResult<Option<EventRecord>>> + Send;

    fn list_events(
        &self,
        ctx: &OrganizationContext,
        filter: EventFilter,
    ) -> impl Future<Output = DbResult<Vec<EventRecord>>> + Send;

    /// Instances generated from `parent_id`, in ascending start order.
    fn list_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
    ) -> impl Future<Output = DbResult<Vec<EventRecord>>> + Send;

    /// Updates one event; `None` if it does not exist.
    fn update_event(
        &self,
        ctx: &OrganizationContext,
        id: &str,
        changes: &EventChanges,
    ) -> impl Future<Output = DbResult<Option<EventRecord>>> + Send;

    /// Updates every instance of `parent_id`; returns the number changed.
    fn update_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
        changes: &EventChanges,
    ) -> impl Future<Output = DbResult<usize>> + Send;

    /// Deletes one event; returns the number removed.
    fn delete_event(
        &self,
        ctx: &OrganizationContext,
        id: &str,
    ) -> impl Future<Output = DbResult<usize>> + Send;

    /// Deletes every instance of `parent_id`; returns the number removed.
    fn delete_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
    ) -> impl Future<Output = DbResult<usize>> + Send;
}

/// Volunteer assignments. Deleting an event deletes its assignments.
pub trait VolunteerStore: Send + Sync {
    /// Stores an assignment under a new id.
    fn insert_volunteer(
        &self,
        ctx: &OrganizationContext,
        volunteer: NewVolunteer,
    ) -> impl Future<Output = DbResult<EventVolunteer>> + Send;

    /// Updates role and notes; `None` if the assignment does not exist.
    fn update_volunteer(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        changes: &VolunteerChanges,
    ) -> impl Future<Output = DbResult<Option<EventVolunteer>>> + Send;

    /// Deletes one assignment; returns the number removed.
    fn delete_volunteer(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
    ) -> impl Future<Output = DbResult<usize>> + Send;

    /// Assignments of one event, oldest first.
    fn list_volunteers(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> impl Future<Output = DbResult<Vec<EventVolunteer>>> + Send;

    /// Every assignment with its event, in ascending event start order.
    fn list_assignments(
        &self,
        ctx: &OrganizationContext,
    ) -> impl Future<Output = DbResult<Vec<VolunteerAssignment>>> + Send;
}

/// Attendance records, at most one per event and member. Deleting an event
/// deletes its records.
pub trait AttendanceStore: Send + Sync {
    /// Records attendance, replacing the status of an existing record.
    fn upsert_attendance(
        &self,
        ctx: &OrganizationContext,
        attendance: NewAttendance<'_>,
    ) -> impl Future<Output = DbResult<Attendance>> + Send;

    fn list_event_attendance(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> impl Future<Output = DbResult<Vec<Attendance>>> + Send;

    /// One member's records with their events, newest record first.
    fn list_member_attendance(
        &self,
        ctx: &OrganizationContext,
        member_id: MemberId,
    ) -> impl Future<Output = DbResult<Vec<MemberAttendance>>> + Send;
}
