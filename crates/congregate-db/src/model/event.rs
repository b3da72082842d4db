use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use congregate_calendar::{EventInstance, EventRule, Recurrence, SeriesOccurrence};
use congregate_core::types::OrganizationId;

use crate::db::enums::AttendanceType;
use crate::model::volunteer::VolunteerRoles;

/// A stored event: a one-off event, a recurring master, or one of its instances.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: String,
    pub organization_id: OrganizationId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub url: Option<String>,
    /// `None` for one-off events.
    pub recurrence: Option<Recurrence>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    pub event_type: String,
    pub needs_volunteers: bool,
    pub volunteer_roles: VolunteerRoles,
    pub is_master: bool,
    pub parent_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRecord {
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Id of the master that owns this event's series. A master (or a one-off
    /// event) owns itself.
    #[must_use]
    pub fn master_id(&self) -> &str {
        if self.is_master {
            &self.id
        } else {
            self.parent_event_id.as_deref().unwrap_or(&self.id)
        }
    }

    /// Logical identity used to group stored rows of the same series.
    #[must_use]
    pub fn series_key(&self) -> String {
        let pattern = self
            .recurrence
            .as_ref()
            .map_or("non-recurring", Recurrence::as_str);
        format!("{}-{pattern}", self.title)
    }

    /// Recurrence rule rooted at this event, or `None` for one-off events.
    #[must_use]
    pub fn rule(&self, timezone: Tz) -> Option<EventRule> {
        let recurrence = self.recurrence.clone()?;
        Some(EventRule::new(
            self.id.clone(),
            self.start_date,
            self.end_date,
            recurrence,
            timezone,
        ))
    }

    /// Builds the record a store returns for `new` inserted under `organization_id`.
    #[must_use]
    pub fn from_new(organization_id: OrganizationId, new: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            organization_id,
            title: new.title,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            location: new.location,
            url: new.url,
            recurrence: new.recurrence,
            allow_rsvp: new.allow_rsvp,
            attendance_type: new.attendance_type,
            event_type: new.event_type,
            needs_volunteers: new.needs_volunteers,
            volunteer_roles: new.volunteer_roles,
            is_master: new.is_master,
            parent_event_id: new.parent_event_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Insertable copy of this record, used to restore deleted rows.
    #[must_use]
    pub fn to_new(&self) -> NewEvent {
        NewEvent {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location.clone(),
            url: self.url.clone(),
            recurrence: self.recurrence.clone(),
            allow_rsvp: self.allow_rsvp,
            attendance_type: self.attendance_type,
            event_type: self.event_type.clone(),
            needs_volunteers: self.needs_volunteers,
            volunteer_roles: self.volunteer_roles.clone(),
            is_master: self.is_master,
            parent_event_id: self.parent_event_id.clone(),
        }
    }
}

impl SeriesOccurrence for EventRecord {
    fn starts_at(&self) -> DateTime<Utc> {
        self.start_date
    }

    fn ends_at(&self) -> DateTime<Utc> {
        self.end_date
    }

    fn recurrence(&self) -> Option<Recurrence> {
        self.recurrence.clone()
    }

    fn with_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_date: start,
            end_date: end,
            ..self.clone()
        }
    }
}

/// The event columns shown next to volunteer and attendance rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<Utc>,
}

impl From<&EventRecord> for EventSummary {
    fn from(event: &EventRecord) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            start_date: event.start_date,
        }
    }
}

/// Event fields supplied on insert. The organization comes from the call's context.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    pub event_type: String,
    pub needs_volunteers: bool,
    pub volunteer_roles: VolunteerRoles,
    pub is_master: bool,
    pub parent_event_id: Option<String>,
}

impl NewEvent {
    /// Instance row for one generated occurrence of this master.
    #[must_use]
    pub fn instance(&self, occurrence: &EventInstance) -> Self {
        Self {
            id: occurrence.id.clone(),
            start_date: occurrence.start,
            end_date: occurrence.end,
            is_master: false,
            parent_event_id: Some(occurrence.parent_event_id.clone()),
            ..self.clone()
        }
    }
}

/// Field values written by an update.
///
/// `schedule` is `None` when the update must leave the stored dates alone, which
/// is how changes cascade from a master to its instances.
#[derive(Debug, Clone, PartialEq)]
pub struct EventChanges {
    pub title: String,
    pub description: Option<String>,
    pub schedule: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    /// `None` keeps the stored event type.
    pub event_type: Option<String>,
    pub needs_volunteers: bool,
    pub volunteer_roles: VolunteerRoles,
    /// `None` keeps the stored flag.
    pub is_master: Option<bool>,
}

impl EventChanges {
    /// The same changes without the dates.
    #[must_use]
    pub fn without_schedule(&self) -> Self {
        Self {
            schedule: None,
            ..self.clone()
        }
    }

    /// The same changes, additionally marking the target as a master.
    #[must_use]
    pub fn as_master(&self) -> Self {
        Self {
            is_master: Some(true),
            ..self.clone()
        }
    }

    /// Applies the changes to an in-memory record.
    pub fn apply(&self, record: &mut EventRecord, now: DateTime<Utc>) {
        record.title.clone_from(&self.title);
        record.description.clone_from(&self.description);
        if let Some((start, end)) = self.schedule {
            record.start_date = start;
            record.end_date = end;
        }
        record.location.clone_from(&self.location);
        record.url.clone_from(&self.url);
        record.recurrence.clone_from(&self.recurrence);
        record.allow_rsvp = self.allow_rsvp;
        record.attendance_type = self.attendance_type;
        if let Some(event_type) = &self.event_type {
            record.event_type.clone_from(event_type);
        }
        record.needs_volunteers = self.needs_volunteers;
        record.volunteer_roles.clone_from(&self.volunteer_roles);
        if let Some(is_master) = self.is_master {
            record.is_master = is_master;
        }
        record.updated_at = now;
    }
}

/// ## Summary
/// Resolves the stored recurrence columns.
///
/// A recurring row whose monthly fields are incomplete keeps its pattern name as
/// `Recurrence::Unrecognized` and therefore steps weekly.
#[must_use]
pub fn recurrence_from_columns(
    is_recurring: bool,
    pattern: Option<&str>,
    monthly_week: Option<i32>,
    monthly_weekday: Option<i32>,
) -> Option<Recurrence> {
    if !is_recurring {
        return None;
    }
    let pattern = pattern.unwrap_or_default();
    Some(
        Recurrence::from_parts(pattern, monthly_week, monthly_weekday).unwrap_or_else(|err| {
            tracing::warn!(%pattern, error = %err, "Stored recurrence is incomplete, stepping weekly");
            Recurrence::Unrecognized(pattern.to_string())
        }),
    )
}
