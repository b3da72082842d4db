//! Query composition for `event_attendance`.

use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::rows::{AttendanceRow, NewAttendanceRow};
use crate::db::schema::{event_attendance, events};


/// Attendance joined with its events.
pub type MemberAttendanceQuery = IntoBoxed<'static, InnerJoin<event_attendance::table, events::table>, Pg>;

/// ## Summary
/// Returns a query for the attendance recorded at one event.
#[must_use]
pub fn for_event(organization_id: Uuid, event_id: &str) -> event_attendance::BoxedQuery<'_, Pg> {
    event_attendance::table
        .filter(event_attendance::organization_id.eq(organization_id))
        .filter(event_attendance::event_id.eq(event_id))
        .order(event_attendance::created_at.asc())
        .into_boxed()
}

/// ## Summary
/// Returns a query for one member's attendance with the events, newest record first.
#[must_use]
pub fn for_member(organization_id: Uuid, member_id: Uuid) -> MemberAttendanceQuery {
    event_attendance::table
        .inner_join(events::table)
        .into_boxed()
        .filter(event_attendance::organization_id.eq(organization_id))
        .filter(event_attendance::member_id.eq(member_id))
        .order(event_attendance::created_at.desc())
}

/// ## Summary
/// Records attendance, replacing the status of an existing record for the same
/// event and member.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn upsert(conn: &mut DbConnection<'_>, row: &NewAttendanceRow<'_>) -> QueryResult<AttendanceRow> {
    diesel::insert_into(event_attendance::table)
        .values(row)
        .on_conflict((event_attendance::event_id, event_attendance::member_id))
        .do_update()
        .set((
            event_attendance::status.eq(excluded(event_attendance::status)),
            event_attendance::updated_at.eq(excluded(event_attendance::updated_at)),
        ))
        .returning(AttendanceRow::as_returning())
        .get_result(conn)
        .await
}
