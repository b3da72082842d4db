//! Submitted event fields and their normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use congregate_calendar::Recurrence;
use congregate_core::util::slug::{MAX_ID_LEN, generate_bounded_slug};
use congregate_db::db::enums::AttendanceType;
use congregate_db::model::event::{EventChanges, NewEvent};
use congregate_db::model::volunteer::VolunteerRoles;

use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_EVENT_TYPE: &str = "Sunday Worship Service";

/// ## Summary
/// Event fields as submitted by a form or API client.
///
/// Text fields may be blank and the monthly fields may arrive as text; nothing is
/// trusted until [`EventDraft::normalize`] has run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub monthly_week: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub monthly_weekday: Option<i32>,
    #[serde(default)]
    pub allow_rsvp: Option<bool>,
    #[serde(default, deserialize_with = "lenient_attendance_type")]
    pub attendance_type: Option<AttendanceType>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub needs_volunteers: bool,
    #[serde(default)]
    pub volunteer_roles: Option<Value>,
}

/// ## Summary
/// Reads an integer from a number or from text.
///
/// Blank or non-numeric text, fractions and values outside `i32` yield `None`.
#[must_use]
pub fn parse_lenient_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_lenient_int))
}

/// Blank text reads as unset; anything else must name an attendance type.
fn lenient_attendance_type<'de, D>(deserializer: D) -> Result<Option<AttendanceType>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = non_blank(Option::<String>::deserialize(deserializer)?) else {
        return Ok(None);
    };
    text.parse().map(Some).map_err(serde::de::Error::custom)
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// ## Summary
/// Id of a new master or one-off event: the slug of the title and the start's
/// epoch milliseconds, bounded to the id column.
#[must_use]
pub fn event_id(title: &str, start: DateTime<Utc>) -> String {
    generate_bounded_slug(&format!("{title}-{}", start.timestamp_millis()), MAX_ID_LEN)
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub allow_rsvp: bool,
    pub attendance_type: AttendanceType,
    /// `None` when the draft left it blank.
    pub event_type: Option<String>,
    pub needs_volunteers: bool,
    pub volunteer_roles: VolunteerRoles,
}

impl EventDraft {
    /// ## Summary
    /// Validates the draft and resolves its recurrence.
    ///
    /// The recurrence pattern is only read when `is_recurring` is set, and the
    /// monthly fields only for `monthly_weekday`. An end before the start is
    /// accepted and logged.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` if the title is blank, a recurring
    /// draft has no pattern, or a `monthly_weekday` draft lacks a valid week (1-5)
    /// or weekday (0-6).
    pub fn normalize(self) -> ServiceResult<NormalizedEvent> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::ValidationError("title is required".to_string()));
        }

        if self.end_date < self.start_date {
            tracing::warn!(
                start = %self.start_date,
                end = %self.end_date,
                "Event ends before it starts"
            );
        }

        let recurrence = if self.is_recurring {
            let pattern = self
                .recurrence_pattern
                .as_deref()
                .map(str::trim)
                .filter(|pattern| !pattern.is_empty())
                .ok_or_else(|| {
                    ServiceError::ValidationError(
                        "recurrence_pattern is required for a recurring event".to_string(),
                    )
                })?;
            Some(Recurrence::from_parts(
                pattern,
                self.monthly_week,
                self.monthly_weekday,
            )?)
        } else {
            None
        };

        Ok(NormalizedEvent {
            title,
            description: non_blank(self.description),
            start_date: self.start_date,
            end_date: self.end_date,
            location: non_blank(self.location),
            url: non_blank(self.url),
            recurrence,
            allow_rsvp: self.allow_rsvp.unwrap_or(true),
            attendance_type: self.attendance_type.unwrap_or_default(),
            event_type: non_blank(self.event_type),
            needs_volunteers: self.needs_volunteers,
            volunteer_roles: self
                .volunteer_roles
                .map_or(VolunteerRoles::None, VolunteerRoles::from_json),
        })
    }
}

impl NormalizedEvent {
    #[must_use]
    pub fn event_id(&self) -> String {
        event_id(&self.title, self.start_date)
    }

    /// Row for a new one-off event or recurring master.
    #[must_use]
    pub fn new_event(&self, id: String) -> NewEvent {
        NewEvent {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location.clone(),
            url: self.url.clone(),
            recurrence: self.recurrence.clone(),
            allow_rsvp: self.allow_rsvp,
            attendance_type: self.attendance_type,
            event_type: self
                .event_type
                .clone()
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            needs_volunteers: self.needs_volunteers,
            volunteer_roles: self.volunteer_roles.clone(),
            is_master: self.recurrence.is_some(),
            parent_event_id: None,
        }
    }

    /// Changes that overwrite a stored event with this draft.
    #[must_use]
    pub fn changes(&self) -> EventChanges {
        EventChanges {
            title: self.title.clone(),
            description: self.description.clone(),
            schedule: Some((self.start_date, self.end_date)),
            location: self.location.clone(),
            url: self.url.clone(),
            recurrence: self.recurrence.clone(),
            allow_rsvp: self.allow_rsvp,
            attendance_type: self.attendance_type,
            event_type: self.event_type.clone(),
            needs_volunteers: self.needs_volunteers,
            volunteer_roles: self.volunteer_roles.clone(),
            is_master: None,
        }
    }
}
