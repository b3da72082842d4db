//! PostgreSQL store.

use chrono::Utc;
use congregate_core::types::{MemberId, OrganizationContext};
use diesel::result::DatabaseErrorKind;
use diesel::{QueryDsl, QueryResult, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbPool;
use crate::db::query::{attendance, event, volunteer};
use crate::db::rows::{
    AttendanceRow, EventChangesRow, EventRow, EventSummaryRow, NewAttendanceRow, NewEventRow,
    VolunteerChangesRow, VolunteerRow,
};
use crate::error::{DbError, DbResult};
use crate::model::assignment::{EventVolunteer, NewVolunteer, VolunteerAssignment, VolunteerChanges};
use crate::model::attendance::{Attendance, MemberAttendance, NewAttendance};
use crate::model::event::{EventChanges, EventRecord, NewEvent};
use crate::store::{AttendanceStore, EventFilter, EventStore, VolunteerStore};

/// Store backed by the `events`, `event_volunteers` and `event_attendance` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Maps unique violations to `DbError::Conflict` and foreign key violations to
/// `DbError::MissingReference`.
fn map_write_error(err: diesel::result::Error) -> DbError {
    match err {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbError::Conflict(info.message().to_string())
        }
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DbError::MissingReference(info.message().to_string())
        }
        other => DbError::DatabaseError(other),
    }
}

fn records(rows: QueryResult<Vec<EventRow>>) -> DbResult<Vec<EventRecord>> {
    Ok(rows?.into_iter().map(EventRecord::from).collect())
}

impl EventStore for PgStore {
    #[tracing::instrument(skip(self, events), fields(organization_id = %ctx.organization_id, count = events.len()))]
    async fn insert_events(
        &self,
        ctx: &OrganizationContext,
        events: &[NewEvent],
    ) -> DbResult<Vec<EventRecord>> {
        let now = Utc::now();
        let rows: Vec<NewEventRow<'_>> = events
            .iter()
            .map(|event| NewEventRow::new(ctx.organization_id, event, now))
            .collect();

        let mut conn = self.pool.get().await?;
        let inserted = event::insert_batch(&mut conn, &rows)
            .await
            .map_err(map_write_error)?;

        tracing::debug!("Inserted events");
        Ok(inserted.into_iter().map(EventRecord::from).collect())
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn get_event(&self, ctx: &OrganizationContext, id: &str) -> DbResult<Option<EventRecord>> {
        let mut conn = self.pool.get().await?;
        let row = event::get(&mut conn, ctx.organization_id.as_uuid(), id).await?;
        Ok(row.map(EventRecord::from))
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn list_events(
        &self,
        ctx: &OrganizationContext,
        filter: EventFilter,
    ) -> DbResult<Vec<EventRecord>> {
        let limit = filter
            .limit
            .map(i64::try_from)
            .transpose()
            .map_err(|_err| DbError::InvalidStoredValue("limit out of range".to_string()))?;

        let mut conn = self.pool.get().await?;
        records(
            event::listing(
                ctx.organization_id.as_uuid(),
                filter.starting_from,
                filter.needs_volunteers,
                limit,
            )
            .select(EventRow::as_select())
            .load(&mut conn)
            .await,
        )
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn list_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
    ) -> DbResult<Vec<EventRecord>> {
        let mut conn = self.pool.get().await?;
        records(
            event::by_parent(ctx.organization_id.as_uuid(), parent_id)
                .select(EventRow::as_select())
                .load(&mut conn)
                .await,
        )
    }

    #[tracing::instrument(skip(self, changes), fields(organization_id = %ctx.organization_id))]
    async fn update_event(
        &self,
        ctx: &OrganizationContext,
        id: &str,
        changes: &EventChanges,
    ) -> DbResult<Option<EventRecord>> {
        let row = EventChangesRow::new(changes, Utc::now());
        let mut conn = self.pool.get().await?;
        let updated = event::update_by_id(&mut conn, ctx.organization_id.as_uuid(), id, &row).await?;
        Ok(updated.map(EventRecord::from))
    }

    #[tracing::instrument(skip(self, changes), fields(organization_id = %ctx.organization_id))]
    async fn update_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
        changes: &EventChanges,
    ) -> DbResult<usize> {
        let row = EventChangesRow::new(changes, Utc::now());
        let mut conn = self.pool.get().await?;
        Ok(event::update_by_parent(&mut conn, ctx.organization_id.as_uuid(), parent_id, &row).await?)
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn delete_event(&self, ctx: &OrganizationContext, id: &str) -> DbResult<usize> {
        let mut conn = self.pool.get().await?;
        Ok(event::delete_by_id(&mut conn, ctx.organization_id.as_uuid(), id).await?)
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn delete_instances(&self, ctx: &OrganizationContext, parent_id: &str) -> DbResult<usize> {
        let mut conn = self.pool.get().await?;
        Ok(event::delete_by_parent(&mut conn, ctx.organization_id.as_uuid(), parent_id).await?)
    }
}

impl VolunteerStore for PgStore {
    #[tracing::instrument(skip(self, volunteer), fields(organization_id = %ctx.organization_id, event_id = %volunteer.event_id))]
    async fn insert_volunteer(
        &self,
        ctx: &OrganizationContext,
        volunteer: NewVolunteer,
    ) -> DbResult<EventVolunteer> {
        let stored = EventVolunteer::from_new(ctx.organization_id, Uuid::now_v7(), volunteer, Utc::now());
        let row = VolunteerRow::from(&stored);

        let mut conn = self.pool.get().await?;
        let inserted = volunteer::insert(&mut conn, &row)
            .await
            .map_err(map_write_error)?;
        Ok(EventVolunteer::from(inserted))
    }

    #[tracing::instrument(skip(self, changes), fields(organization_id = %ctx.organization_id))]
    async fn update_volunteer(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        changes: &VolunteerChanges,
    ) -> DbResult<Option<EventVolunteer>> {
        let row = VolunteerChangesRow::new(changes, Utc::now());
        let mut conn = self.pool.get().await?;
        let updated = volunteer::update_by_id(&mut conn, ctx.organization_id.as_uuid(), id, &row).await?;
        Ok(updated.map(EventVolunteer::from))
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn delete_volunteer(&self, ctx: &OrganizationContext, id: Uuid) -> DbResult<usize> {
        let mut conn = self.pool.get().await?;
        Ok(volunteer::delete_by_id(&mut conn, ctx.organization_id.as_uuid(), id).await?)
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn list_volunteers(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> DbResult<Vec<EventVolunteer>> {
        let mut conn = self.pool.get().await?;
        let rows = volunteer::for_event(ctx.organization_id.as_uuid(), event_id)
            .select(VolunteerRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(EventVolunteer::from).collect())
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn list_assignments(&self, ctx: &OrganizationContext) -> DbResult<Vec<VolunteerAssignment>> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(VolunteerRow, EventSummaryRow)> = volunteer::assignments(ctx.organization_id.as_uuid())
            .select((VolunteerRow::as_select(), EventSummaryRow::as_select()))
            .load(&mut conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(volunteer, event)| VolunteerAssignment {
                volunteer: volunteer.into(),
                event: event.into(),
            })
            .collect())
    }
}

impl AttendanceStore for PgStore {
    #[tracing::instrument(skip(self, attendance), fields(organization_id = %ctx.organization_id, event_id = %attendance.event_id))]
    async fn upsert_attendance(
        &self,
        ctx: &OrganizationContext,
        attendance: NewAttendance<'_>,
    ) -> DbResult<Attendance> {
        let row = NewAttendanceRow::new(ctx.organization_id, &attendance, Utc::now());
        let mut conn = self.pool.get().await?;
        let stored = attendance::upsert(&mut conn, &row)
            .await
            .map_err(map_write_error)?;
        Ok(Attendance::from(stored))
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn list_event_attendance(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> DbResult<Vec<Attendance>> {
        let mut conn = self.pool.get().await?;
        let rows = attendance::for_event(ctx.organization_id.as_uuid(), event_id)
            .select(AttendanceRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(Attendance::from).collect())
    }

    #[tracing::instrument(skip(self), fields(organization_id = %ctx.organization_id))]
    async fn list_member_attendance(
        &self,
        ctx: &OrganizationContext,
        member_id: MemberId,
    ) -> DbResult<Vec<MemberAttendance>> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(AttendanceRow, EventSummaryRow)> =
            attendance::for_member(ctx.organization_id.as_uuid(), member_id.as_uuid())
                .select((AttendanceRow::as_select(), EventSummaryRow::as_select()))
                .load(&mut conn)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(attendance, event)| MemberAttendance {
                attendance: attendance.into(),
                event: event.into(),
            })
            .collect())
    }
}
