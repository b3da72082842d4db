//! Attendance over an [`AttendanceStore`].

use congregate_core::types::{MemberId, OrganizationContext};
use congregate_db::db::enums::AttendanceStatus;
use congregate_db::model::attendance::{Attendance, MemberAttendance, NewAttendance};
use congregate_db::store::{AttendanceStore, EventStore};

use crate::clock::{Clock, SystemClock};
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Records who attends which event.
///
/// A member has one record per event; recording again replaces its status.
pub struct AttendanceService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: EventStore + AttendanceStore> AttendanceService<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: EventStore + AttendanceStore, C: Clock> AttendanceService<S, C> {
    #[must_use]
    pub const fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// ## Summary
    /// Records `member_id` at an event with `status`, `Attending` when none is given.
    ///
    /// ## Errors
    /// Returns `NotFound` if the event does not exist, or a store error.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn record_attendance(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
        member_id: MemberId,
        status: Option<AttendanceStatus>,
    ) -> ServiceResult<Attendance> {
        if self.store.get_event(ctx, event_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("event '{event_id}'")));
        }

        let attendance = NewAttendance {
            event_id,
            member_id,
            status: status.unwrap_or_default(),
        };
        Ok(self.store.upsert_attendance(ctx, attendance).await?)
    }

    /// ## Errors
    /// Returns a store error.
    pub async fn event_attendance(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> ServiceResult<Vec<Attendance>> {
        Ok(self.store.list_event_attendance(ctx, event_id).await?)
    }

    /// ## Summary
    /// A member's attendance history, newest record first. Records of events
    /// that have already started read as `Attended`.
    ///
    /// ## Errors
    /// Returns a store error.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn member_attendance(
        &self,
        ctx: &OrganizationContext,
        member_id: MemberId,
    ) -> ServiceResult<Vec<MemberAttendance>> {
        let now = self.clock.now();
        let records = self.store.list_member_attendance(ctx, member_id).await?;
        Ok(records.into_iter().map(|record| record.as_of(now)).collect())
    }
}
