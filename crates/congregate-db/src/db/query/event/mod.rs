//! Query composition for `events`.
//!
//! Every query is scoped to one organization.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::rows::{EventChangesRow, EventRow, NewEventRow};
use crate::db::schema::events;

#[cfg(test)]
mod event_tests;

/// ## Summary
/// Returns a query to select all events of an organization.
#[must_use]
pub fn by_organization(organization_id: Uuid) -> events::BoxedQuery<'static, diesel::pg::Pg> {
    events::table
        .filter(events::organization_id.eq(organization_id))
        .into_boxed()
}

/// ## Summary
/// Returns a query to find an event by ID.
#[must_use]
pub fn by_id(organization_id: Uuid, id: &str) -> events::BoxedQuery<'_, diesel::pg::Pg> {
    by_organization(organization_id).filter(events::id.eq(id))
}

/// ## Summary
/// Returns a query to find the instances generated from a master.
#[must_use]
pub fn by_parent(organization_id: Uuid, parent_id: &str) -> events::BoxedQuery<'_, diesel::pg::Pg> {
    by_organization(organization_id)
        .filter(events::parent_event_id.eq(parent_id))
        .order(events::start_date.asc())
}

/// ## Summary
/// Returns a query for an organization's events in ascending start order,
/// optionally restricted to those starting at or after `starting_from` and to
/// those that need volunteers.
#[must_use]
pub fn listing(
    organization_id: Uuid,
    starting_from: Option<DateTime<Utc>>,
    needs_volunteers: Option<bool>,
    limit: Option<i64>,
) -> events::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = by_organization(organization_id);
    if let Some(from) = starting_from {
        query = query.filter(events::start_date.ge(from));
    }
    if let Some(needs) = needs_volunteers {
        query = query.filter(events::needs_volunteers.eq(needs));
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.order((events::start_date.asc(), events::id.asc()))
}

/// ## Summary
/// Inserts events in a batch and returns the stored rows.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_batch(
    conn: &mut DbConnection<'_>,
    rows: &[NewEventRow<'_>],
) -> QueryResult<Vec<EventRow>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    diesel::insert_into(events::table)
        .values(rows)
        .returning(EventRow::as_returning())
        .get_results(conn)
        .await
}

/// ## Summary
/// Loads a single event.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get(
    conn: &mut DbConnection<'_>,
    organization_id: Uuid,
    id: &str,
) -> QueryResult<Option<EventRow>> {
    by_id(organization_id, id)
        .select(EventRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Updates a single event and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_by_id(
    conn: &mut DbConnection<'_>,
    organization_id: Uuid,
    id: &str,
    changes: &EventChangesRow<'_>,
) -> QueryResult<Option<EventRow>> {
    diesel::update(
        events::table
            .filter(events::organization_id.eq(organization_id))
            .filter(events::id.eq(id)),
    )
    .set(changes)
    .returning(EventRow::as_returning())
    .get_result(conn)
    .await
    .optional()
}

/// ## Summary
/// Updates every instance of a master and returns the number of rows changed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_by_parent(
    conn: &mut DbConnection<'_>,
    organization_id: Uuid,
    parent_id: &str,
    changes: &EventChangesRow<'_>,
) -> QueryResult<usize> {
    diesel::update(
        events::table
            .filter(events::organization_id.eq(organization_id))
            .filter(events::parent_event_id.eq(parent_id)),
    )
    .set(changes)
    .execute(conn)
    .await
}

/// ## Summary
/// Deletes a single event and returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_by_id(
    conn: &mut DbConnection<'_>,
    organization_id: Uuid,
    id: &str,
) -> QueryResult<usize> {
    diesel::delete(
        events::table
            .filter(events::organization_id.eq(organization_id))
            .filter(events::id.eq(id)),
    )
    .execute(conn)
    .await
}

/// ## Summary
/// Deletes every instance of a master and returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_by_parent(
    conn: &mut DbConnection<'_>,
    organization_id: Uuid,
    parent_id: &str,
) -> QueryResult<usize> {
    diesel::delete(
        events::table
            .filter(events::organization_id.eq(organization_id))
            .filter(events::parent_event_id.eq(parent_id)),
    )
    .execute(conn)
    .await
}
