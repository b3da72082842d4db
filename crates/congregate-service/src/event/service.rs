//! Recurring-series lifecycle over an [`EventStore`].

use chrono_tz::Tz;

use congregate_calendar::{expand, horizon_end};
use congregate_core::config::CalendarConfig;
use congregate_core::types::OrganizationContext;
use congregate_db::model::event::{EventRecord, NewEvent};
use congregate_db::store::{EventFilter, EventStore};

use super::draft::EventDraft;
use super::upcoming::resolve_upcoming;
use crate::clock::{Clock, SystemClock};
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Creates, updates and deletes events, keeping a recurring master and its
/// generated instances consistent.
///
/// The store offers no transactions. Multi-step writes compensate instead: a
/// failed instance insert removes the new master or, when regenerating, puts
/// back the instances it replaced; a failed master delete restores the
/// instances removed before it.
pub struct EventService<S, C = SystemClock> {
    store: S,
    clock: C,
    timezone: Tz,
    horizon_years: u32,
}

fn single_row(mut rows: Vec<EventRecord>) -> ServiceResult<EventRecord> {
    rows.pop()
        .ok_or(ServiceError::InvariantViolation("insert returned no row"))
}

impl<S: EventStore> EventService<S> {
    /// ## Errors
    /// Returns an error if the configured timezone is unknown.
    pub fn new(store: S, calendar: &CalendarConfig) -> ServiceResult<Self> {
        Self::with_clock(store, SystemClock, calendar)
    }
}

impl<S: EventStore, C: Clock> EventService<S, C> {
    /// ## Errors
    /// Returns an error if the configured timezone is unknown.
    pub fn with_clock(store: S, clock: C, calendar: &CalendarConfig) -> ServiceResult<Self> {
        Ok(Self {
            store,
            clock,
            timezone: calendar.tz()?,
            horizon_years: calendar.horizon_years,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    async fn require(&self, ctx: &OrganizationContext, id: &str) -> ServiceResult<EventRecord> {
        self.store
            .get_event(ctx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("event '{id}'")))
    }

    /// Instance rows of a stored master up to the horizon measured from now.
    fn instances_of(&self, master: &EventRecord) -> Vec<NewEvent> {
        let Some(rule) = master.rule(self.timezone) else {
            return Vec::new();
        };
        let template = master.to_new();
        expand(&rule, horizon_end(self.clock.now(), self.horizon_years))
            .iter()
            .map(|occurrence| template.instance(occurrence))
            .collect()
    }

    /// ## Summary
    /// Stores a new event and, for a recurring one, its instances up to the horizon.
    ///
    /// Returns the master, or the single row of a one-off event.
    ///
    /// ## Errors
    /// Returns `ValidationError` for an invalid draft, `Conflict` if an event with
    /// the same id exists, or the store error of a failed insert. If the instance
    /// insert fails the master is deleted again before the error is returned.
    #[tracing::instrument(skip(self, draft), fields(
        organization_id = %ctx.organization_id,
        title = %draft.title,
        recurring = draft.is_recurring
    ))]
    pub async fn create_event(
        &self,
        ctx: &OrganizationContext,
        draft: EventDraft,
    ) -> ServiceResult<EventRecord> {
        let event = draft.normalize()?;
        let row = event.new_event(event.event_id());

        let stored = single_row(self.store.insert_events(ctx, std::slice::from_ref(&row)).await?)?;
        if !row.is_master {
            tracing::debug!(id = %stored.id, "Created event");
            return Ok(stored);
        }

        let instances = self.instances_of(&stored);
        if let Err(err) = self.store.insert_events(ctx, &instances).await {
            tracing::warn!(master_id = %stored.id, error = %err, "Instance insert failed, removing master");
            if let Err(cleanup_err) = self.store.delete_event(ctx, &stored.id).await {
                tracing::error!(
                    master_id = %stored.id,
                    error = %cleanup_err,
                    "Failed to remove master after instance insert failure"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            master_id = %stored.id,
            instances = instances.len(),
            "Created recurring event"
        );
        Ok(stored)
    }

    /// ## Summary
    /// Overwrites an event with `draft`.
    ///
    /// When the stored event is recurring the change goes to its master, dates
    /// included, and every instance of that master receives the same fields except
    /// its dates. Instances are not regenerated; see
    /// [`EventService::regenerate_instances`].
    ///
    /// ## Errors
    /// Returns `NotFound` if the event or its master does not exist,
    /// `ValidationError` for an invalid draft, or a store error.
    #[tracing::instrument(skip(self, draft), fields(organization_id = %ctx.organization_id))]
    pub async fn update_event(
        &self,
        ctx: &OrganizationContext,
        id: &str,
        draft: EventDraft,
    ) -> ServiceResult<EventRecord> {
        let existing = self.require(ctx, id).await?;
        let changes = draft.normalize()?.changes();

        if !existing.is_recurring() {
            return self
                .store
                .update_event(ctx, id, &changes)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("event '{id}'")));
        }

        let master_id = existing.master_id();
        let master = self
            .store
            .update_event(ctx, master_id, &changes.as_master())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("master event '{master_id}'")))?;

        let cascaded = self
            .store
            .update_instances(ctx, master_id, &changes.without_schedule())
            .await?;

        tracing::debug!(%master_id, instances = cascaded, "Updated recurring event");
        Ok(master)
    }

    /// ## Summary
    /// Deletes an event. For a recurring event the whole series goes: first the
    /// instances, then the master.
    ///
    /// Returns the number of rows removed.
    ///
    /// ## Errors
    /// Returns `NotFound` if the event does not exist, or a store error. If the
    /// master delete fails the removed instances are inserted again before the
    /// error is returned; their volunteer assignments and attendance are not.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn delete_event(&self, ctx: &OrganizationContext, id: &str) -> ServiceResult<usize> {
        let existing = self.require(ctx, id).await?;
        if !existing.is_recurring() {
            return Ok(self.store.delete_event(ctx, id).await?);
        }

        let master_id = existing.master_id();
        let snapshot = self.store.list_instances(ctx, master_id).await?;
        let removed_instances = self.store.delete_instances(ctx, master_id).await?;

        match self.store.delete_event(ctx, master_id).await {
            Ok(removed_master) => {
                tracing::debug!(%master_id, instances = removed_instances, "Deleted recurring event");
                Ok(removed_master + removed_instances)
            }
            Err(err) => {
                tracing::warn!(%master_id, error = %err, "Master delete failed, restoring instances");
                let restore: Vec<NewEvent> = snapshot.iter().map(EventRecord::to_new).collect();
                if let Err(restore_err) = self.store.insert_events(ctx, &restore).await {
                    tracing::error!(
                        %master_id,
                        error = %restore_err,
                        "Failed to restore instances after master delete failure"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// ## Summary
    /// Replaces the instances of a recurring series with a fresh expansion of its
    /// master's current rule. `id` may name the master or any of its instances.
    /// Volunteer assignments and attendance of the replaced instances are
    /// deleted with them.
    ///
    /// Returns the number of instances generated.
    ///
    /// ## Errors
    /// Returns `NotFound` if the event or its master does not exist,
    /// `ValidationError` if the series is not recurring, or a store error. If the
    /// new instances cannot be inserted the previous ones are inserted again
    /// before the error is returned.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn regenerate_instances(
        &self,
        ctx: &OrganizationContext,
        id: &str,
    ) -> ServiceResult<usize> {
        let existing = self.require(ctx, id).await?;
        let master = if existing.master_id() == existing.id {
            existing
        } else {
            self.require(ctx, existing.master_id()).await?
        };
        if !master.is_recurring() {
            return Err(ServiceError::ValidationError(format!(
                "event '{}' is not recurring",
                master.id
            )));
        }

        let snapshot = self.store.list_instances(ctx, &master.id).await?;
        let removed = self.store.delete_instances(ctx, &master.id).await?;
        let instances = self.instances_of(&master);

        if let Err(err) = self.store.insert_events(ctx, &instances).await {
            tracing::warn!(master_id = %master.id, error = %err, "Instance insert failed, restoring previous instances");
            let restore: Vec<NewEvent> = snapshot.iter().map(EventRecord::to_new).collect();
            if let Err(restore_err) = self.store.insert_events(ctx, &restore).await {
                tracing::error!(
                    master_id = %master.id,
                    error = %restore_err,
                    "Failed to restore instances after regeneration failure"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            master_id = %master.id,
            removed,
            generated = instances.len(),
            "Regenerated instances"
        );
        Ok(instances.len())
    }

    /// ## Summary
    /// Events starting from now, one entry per logical event.
    ///
    /// Rows are grouped by title and recurrence pattern in ascending start order;
    /// each recurring group is shown at its next occurrence.
    ///
    /// ## Errors
    /// Returns a store error.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn upcoming_events(&self, ctx: &OrganizationContext) -> ServiceResult<Vec<EventRecord>> {
        let now = self.clock.now();
        let events = self.store.list_events(ctx, EventFilter::upcoming(now)).await?;
        Ok(resolve_upcoming(events, now, self.timezone))
    }

    /// ## Summary
    /// Every stored row in ascending start order, masters and instances alike.
    ///
    /// ## Errors
    /// Returns a store error.
    pub async fn all_events(&self, ctx: &OrganizationContext) -> ServiceResult<Vec<EventRecord>> {
        Ok(self.store.list_events(ctx, EventFilter::default()).await?)
    }

    /// ## Summary
    /// Up to `limit` upcoming rows that need volunteers, in ascending start order.
    ///
    /// ## Errors
    /// Returns a store error.
    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    pub async fn events_needing_volunteers(
        &self,
        ctx: &OrganizationContext,
        limit: usize,
    ) -> ServiceResult<Vec<EventRecord>> {
        let filter = EventFilter {
            starting_from: Some(self.clock.now()),
            needs_volunteers: Some(true),
            limit: Some(limit),
        };
        Ok(self.store.list_events(ctx, filter).await?)
    }
}
