//! Query composition for `event_volunteers`.

use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::rows::{VolunteerChangesRow, VolunteerRow};
use crate::db::schema::{event_volunteers, events};

#[cfg(test)]
mod volunteer_tests;

/// Assignments joined with their events.
pub type AssignmentQuery = IntoBoxed<'static, InnerJoin<event_volunteers::table, events::table>, Pg>;

/// ## Summary
/// Returns a query for the assignments of one event, oldest first.
#[must_use]
pub fn for_event(organization_id: Uuid, event_id: &str) -> event_volunteers::BoxedQuery<'_, Pg> {
    event_volunteers::table
        .filter(event_volunteers::organization_id.eq(organization_id))
        .filter(event_volunteers::event_id.eq(event_id))
        .order((event_volunteers::created_at.asc(), event_volunteers::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query for every assignment of an organization together with its
/// event, in ascending event start order.
#[must_use]
pub fn assignments(organization_id: Uuid) -> AssignmentQuery {
    event_volunteers::table
        .inner_join(events::table)
        .into_boxed()
        .filter(event_volunteers::organization_id.eq(organization_id))
        .filter(events::organization_id.eq(organization_id))
        .order((events::start_date.asc(), event_volunteers::created_at.asc()))
}

/// ## Summary
/// Inserts an assignment and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails, including a foreign key
/// violation for an unknown event.
pub async fn insert(conn: &mut DbConnection<'_>, row: &VolunteerRow) -> QueryResult<VolunteerRow> {
    diesel::insert_into(event_volunteers::table)
        .values(row)
        .returning(VolunteerRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Updates the role and notes of an assignment.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_by_id(
    conn: &mut DbConnection<'_>,
    organization_id: Uuid,
    id: Uuid,
    changes: &VolunteerChangesRow<'_>,
) -> QueryResult<Option<VolunteerRow>> {
    diesel::update(
        event_volunteers::table
            .filter(event_volunteers::organization_id.eq(organization_id))
            .filter(event_volunteers::id.eq(id)),
    )
    .set(changes)
    .returning(VolunteerRow::as_returning())
    .get_result(conn)
    .await
    .optional()
}

/// ## Summary
/// Deletes an assignment and returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_by_id(conn: &mut DbConnection<'_>, organization_id: Uuid, id: Uuid) -> QueryResult<usize> {
    diesel::delete(
        event_volunteers::table
            .filter(event_volunteers::organization_id.eq(organization_id))
            .filter(event_volunteers::id.eq(id)),
    )
    .execute(conn)
    .await
}
