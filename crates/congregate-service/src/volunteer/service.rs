//! Volunteer assignment over a [`VolunteerStore`].

use serde::Deserialize;
use uuid::Uuid;

use congregate_core::types::{MemberId, OrganizationContext};
use congregate_db::model::assignment::{EventVolunteer, NewVolunteer, VolunteerChanges};
use congregate_db::store::{EventFilter, EventStore, VolunteerStore};

use super::stats::VolunteerStats;
use crate::clock::{Clock, SystemClock};
use crate::error::{ServiceError, ServiceResult};
use crate::event::draft::non_blank;

/// An assignment as submitted by a form. Blank notes are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolunteerDraft {
    pub role: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl VolunteerDraft {
    fn changes(self) -> ServiceResult<VolunteerChanges> {
        let role = non_blank(Some(self.role))
            .ok_or_else(|| ServiceError::ValidationError("volunteer role is required".to_string()))?;
        Ok(VolunteerChanges {
            role,
            notes: non_blank(self.notes),
        })
    }
}

/// ## Summary
/// Assigns members to events and summarizes volunteering across an organization.
pub struct VolunteerService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: EventStore + VolunteerStore> VolunteerService<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: EventStore + VolunteerStore, C: Clock> VolunteerService<S, C> {
    #[must_use]
    pub const fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// ## Summary
    /// Assigns `member_id` to serve at an event.
    ///
    /// ## Errors
    /// Returns `NotFound` if the event does not exist, `ValidationError` for a
    /// blank role, or a store error.
    #[tracing::instrument(skip(self, draft), fields(organization_id = %ctx.organization_id, role = %draft.role))]
    pub async fn assign_volunteer(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
        member_id: MemberId,
        draft: VolunteerDraft,
    ) -> ServiceResult<EventVolunteer> {
        let changes = draft.changes()?;
        if self.store.get_event(ctx, event_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("event '{event_id}'")));
        }

        let volunteer = self
            .store
            .insert_volunteer(
                ctx,
                NewVolunteer {
                    event_id: event_id.to_string(),
                    member_id,
                    role: changes.role,
                    notes: changes.notes,
                },
            )
            .await?;

        tracing::debug!(id = %volunteer.id, "Assigned volunteer");
        Ok(volunteer)
    }

    /// ## Summary
    /// Replaces the role and notes of an assignment.
    ///
    /// ## Errors
    /// Returns `NotFound` if the assignment does not exist, `ValidationError` for
    /// a blank role, or a store error.
    #[tracing::instrument(skip(self, draft), fields(organization_id = %ctx.organization_id))]
    pub async fn update_volunteer(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        draft: VolunteerDraft,
    ) -> ServiceResult<EventVolunteer> {
        let changes = draft.changes()?;
        self.store
            .update_volunteer(ctx, id, &changes)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("volunteer assignment '{id}'")))
    }

    /// ## Errors
    /// Returns `NotFound` if the assignment does not exist, or a store error.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn remove_volunteer(&self, ctx: &OrganizationContext, id: Uuid) -> ServiceResult<()> {
        match self.store.delete_volunteer(ctx, id).await? {
            0 => Err(ServiceError::NotFound(format!("volunteer assignment '{id}'"))),
            _ => Ok(()),
        }
    }

    /// ## Summary
    /// Assignments of one event in the order they were made.
    ///
    /// ## Errors
    /// Returns a store error.
    pub async fn event_volunteers(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> ServiceResult<Vec<EventVolunteer>> {
        Ok(self.store.list_volunteers(ctx, event_id).await?)
    }

    /// ## Summary
    /// Volunteering across the organization as of now.
    ///
    /// ## Errors
    /// Returns a store error.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn volunteer_stats(&self, ctx: &OrganizationContext) -> ServiceResult<VolunteerStats> {
        let now = self.clock.now();
        let assignments = self.store.list_assignments(ctx).await?;
        let needing = self
            .store
            .list_events(
                ctx,
                EventFilter {
                    needs_volunteers: Some(true),
                    ..EventFilter::upcoming(now)
                },
            )
            .await?;
        Ok(VolunteerStats::compute(assignments, needing, now))
    }
}
