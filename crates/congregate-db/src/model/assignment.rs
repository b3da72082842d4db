//! Members assigned to serve at an event.

use chrono::{DateTime, Utc};
use congregate_core::types::{MemberId, OrganizationId};
use uuid::Uuid;

use crate::model::event::EventSummary;

/// A stored volunteer assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventVolunteer {
    pub id: Uuid,
    pub organization_id: OrganizationId,
    pub event_id: String,
    pub member_id: MemberId,
    pub role: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventVolunteer {
    #[must_use]
    pub fn from_new(
        organization_id: OrganizationId,
        id: Uuid,
        new: NewVolunteer,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            organization_id,
            event_id: new.event_id,
            member_id: new.member_id,
            role: new.role,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVolunteer {
    pub event_id: String,
    pub member_id: MemberId,
    pub role: String,
    pub notes: Option<String>,
}

/// Editable fields of an assignment. `notes = None` clears the notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerChanges {
    pub role: String,
    pub notes: Option<String>,
}

impl VolunteerChanges {
    pub fn apply(&self, volunteer: &mut EventVolunteer, now: DateTime<Utc>) {
        volunteer.role.clone_from(&self.role);
        volunteer.notes.clone_from(&self.notes);
        volunteer.updated_at = now;
    }
}

/// An assignment together with the event it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerAssignment {
    pub volunteer: EventVolunteer,
    pub event: EventSummary,
}
