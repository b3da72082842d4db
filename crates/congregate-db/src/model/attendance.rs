//! Attendance of members at events.

use chrono::{DateTime, Utc};
use congregate_core::types::{MemberId, OrganizationId};

use crate::db::enums::AttendanceStatus;
use crate::model::event::EventSummary;

/// One member's attendance at one event. A member has at most one record per
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub organization_id: OrganizationId,
    pub event_id: String,
    pub member_id: MemberId,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAttendance<'a> {
    pub event_id: &'a str,
    pub member_id: MemberId,
    pub status: AttendanceStatus,
}

/// An attendance record together with the event it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAttendance {
    pub attendance: Attendance,
    pub event: EventSummary,
}

impl MemberAttendance {
    /// Reports the record as `Attended` once its event has started.
    #[must_use]
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        if self.event.start_date < now {
            self.attendance.status = AttendanceStatus::Attended;
        }
        self
    }
}
