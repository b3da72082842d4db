//! Diesel row types and their conversion to the domain model.
//!
//! Recurrence columns and the volunteer roles text are resolved here, once, when a
//! row crosses the store boundary.

use chrono::{DateTime, Utc};
use congregate_core::types::{MemberId, OrganizationId};
use diesel::{pg::Pg, prelude::*};

use crate::db::enums::{AttendanceStatus, AttendanceType};
use crate::db::schema;
use crate::model::assignment::{EventVolunteer, VolunteerChanges};
use crate::model::attendance::{Attendance, NewAttendance};
use crate::model::event::{EventChanges, EventRecord, EventSummary, NewEvent, recurrence_from_columns};
use crate::model::volunteer::VolunteerRoles;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::events)]
#[diesel(check_for_backend(Pg))]
pub struct EventRow {
    pub id: String,
    pub organization_id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub monthly_week: Option<i32>,
    pub monthly_weekday: Option<i32>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    pub event_type: String,
    pub needs_volunteers: bool,
    pub volunteer_roles: Option<String>,
    pub is_master: bool,
    pub parent_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        let recurrence = recurrence_from_columns(
            row.is_recurring,
            row.recurrence_pattern.as_deref(),
            row.monthly_week,
            row.monthly_weekday,
        );
        Self {
            volunteer_roles: VolunteerRoles::from_stored(row.volunteer_roles.as_deref()),
            id: row.id,
            organization_id: OrganizationId(row.organization_id),
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location,
            url: row.url,
            recurrence,
            allow_rsvp: row.allow_rsvp,
            attendance_type: row.attendance_type,
            event_type: row.event_type,
            needs_volunteers: row.needs_volunteers,
            is_master: row.is_master,
            parent_event_id: row.parent_event_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert struct for creating new events
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::events)]
pub struct NewEventRow<'a> {
    pub id: &'a str,
    pub organization_id: uuid::Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<&'a str>,
    pub url: Option<&'a str>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<&'a str>,
    pub monthly_week: Option<i32>,
    pub monthly_weekday: Option<i32>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    pub event_type: &'a str,
    pub needs_volunteers: bool,
    pub volunteer_roles: Option<String>,
    pub is_master: bool,
    pub parent_event_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewEventRow<'a> {
    #[must_use]
    pub fn new(organization_id: OrganizationId, event: &'a NewEvent, now: DateTime<Utc>) -> Self {
        let recurrence = event.recurrence.as_ref();
        Self {
            id: &event.id,
            organization_id: organization_id.as_uuid(),
            title: &event.title,
            description: event.description.as_deref(),
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location.as_deref(),
            url: event.url.as_deref(),
            is_recurring: recurrence.is_some(),
            recurrence_pattern: recurrence.map(|r| r.as_str()),
            monthly_week: recurrence.and_then(|r| r.monthly_week()),
            monthly_weekday: recurrence.and_then(|r| r.monthly_weekday()),
            allow_rsvp: event.allow_rsvp,
            attendance_type: event.attendance_type,
            event_type: &event.event_type,
            needs_volunteers: event.needs_volunteers,
            volunteer_roles: event.volunteer_roles.to_stored(),
            is_master: event.is_master,
            parent_event_id: event.parent_event_id.as_deref(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset for updating events.
///
/// Nullable columns use `Option<Option<_>>` so that `Some(None)` writes `NULL`;
/// a plain `None` leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::events)]
pub struct EventChangesRow<'a> {
    pub title: &'a str,
    pub description: Option<Option<&'a str>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<Option<&'a str>>,
    pub url: Option<Option<&'a str>>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<Option<&'a str>>,
    pub monthly_week: Option<Option<i32>>,
    pub monthly_weekday: Option<Option<i32>>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    pub event_type: Option<&'a str>,
    pub needs_volunteers: bool,
    pub volunteer_roles: Option<Option<String>>,
    pub is_master: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> EventChangesRow<'a> {
    #[must_use]
    pub fn new(changes: &'a EventChanges, now: DateTime<Utc>) -> Self {
        let recurrence = changes.recurrence.as_ref();
        Self {
            title: &changes.title,
            description: Some(changes.description.as_deref()),
            start_date: changes.schedule.map(|(start, _)| start),
            end_date: changes.schedule.map(|(_, end)| end),
            location: Some(changes.location.as_deref()),
            url: Some(changes.url.as_deref()),
            is_recurring: recurrence.is_some(),
            recurrence_pattern: Some(recurrence.map(|r| r.as_str())),
            monthly_week: Some(recurrence.and_then(|r| r.monthly_week())),
            monthly_weekday: Some(recurrence.and_then(|r| r.monthly_weekday())),
            allow_rsvp: changes.allow_rsvp,
            attendance_type: changes.attendance_type,
            event_type: changes.event_type.as_deref(),
            needs_volunteers: changes.needs_volunteers,
            volunteer_roles: Some(changes.volunteer_roles.to_stored()),
            is_master: changes.is_master,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = schema::events)]
#[diesel(check_for_backend(Pg))]
pub struct EventSummaryRow {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<Utc>,
}

impl From<EventSummaryRow> for EventSummary {
    fn from(row: EventSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            start_date: row.start_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = schema::event_volunteers)]
#[diesel(check_for_backend(Pg))]
pub struct VolunteerRow {
    pub id: uuid::Uuid,
    pub organization_id: uuid::Uuid,
    pub event_id: String,
    pub member_id: uuid::Uuid,
    pub role: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VolunteerRow> for EventVolunteer {
    fn from(row: VolunteerRow) -> Self {
        Self {
            id: row.id,
            organization_id: OrganizationId(row.organization_id),
            event_id: row.event_id,
            member_id: MemberId(row.member_id),
            role: row.role,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&EventVolunteer> for VolunteerRow {
    fn from(volunteer: &EventVolunteer) -> Self {
        Self {
            id: volunteer.id,
            organization_id: volunteer.organization_id.as_uuid(),
            event_id: volunteer.event_id.clone(),
            member_id: volunteer.member_id.as_uuid(),
            role: volunteer.role.clone(),
            notes: volunteer.notes.clone(),
            created_at: volunteer.created_at,
            updated_at: volunteer.updated_at,
        }
    }
}

/// Changeset for an assignment. `notes` always writes, so `None` stores `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::event_volunteers)]
#[diesel(treat_none_as_null = true)]
pub struct VolunteerChangesRow<'a> {
    pub role: &'a str,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> VolunteerChangesRow<'a> {
    #[must_use]
    pub fn new(changes: &'a VolunteerChanges, now: DateTime<Utc>) -> Self {
        Self {
            role: &changes.role,
            notes: changes.notes.as_deref(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = schema::event_attendance)]
#[diesel(check_for_backend(Pg))]
pub struct AttendanceRow {
    pub event_id: String,
    pub member_id: uuid::Uuid,
    pub organization_id: uuid::Uuid,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceRow> for Attendance {
    fn from(row: AttendanceRow) -> Self {
        Self {
            organization_id: OrganizationId(row.organization_id),
            event_id: row.event_id,
            member_id: MemberId(row.member_id),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::event_attendance)]
pub struct NewAttendanceRow<'a> {
    pub event_id: &'a str,
    pub member_id: uuid::Uuid,
    pub organization_id: uuid::Uuid,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewAttendanceRow<'a> {
    #[must_use]
    pub fn new(organization_id: OrganizationId, attendance: &NewAttendance<'a>, now: DateTime<Utc>) -> Self {
        Self {
            event_id: attendance.event_id,
            member_id: attendance.member_id.as_uuid(),
            organization_id: organization_id.as_uuid(),
            status: attendance.status,
            created_at: now,
            updated_at: now,
        }
    }
}
