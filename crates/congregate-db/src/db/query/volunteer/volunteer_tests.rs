//! Unit tests for volunteer query builders.

use diesel::query_builder::QueryFragment;

use super::*;
use crate::db::rows::EventSummaryRow;

fn sql<Q>(query: Q) -> String
where
    Q: QueryFragment<Pg>,
{
    diesel::debug_query::<Pg, _>(&query).to_string()
}

#[test]
fn test_for_event_orders_by_creation() {
    let query = sql(for_event(Uuid::new_v4(), "food-drive-1707123600000"));
    assert!(query.contains("\"event_volunteers\".\"organization_id\" = $1"), "{query}");
    assert!(query.contains("\"event_volunteers\".\"event_id\" = $2"), "{query}");
    assert!(
        query.contains("ORDER BY \"event_volunteers\".\"created_at\" ASC"),
        "{query}"
    );
}

#[test]
fn test_assignments_join_events_of_same_organization() {
    let query = sql(
        assignments(Uuid::new_v4()).select((VolunteerRow::as_select(), EventSummaryRow::as_select())),
    );
    assert!(query.contains("INNER JOIN \"events\""), "{query}");
    assert!(query.contains("\"event_volunteers\".\"organization_id\" = $1"), "{query}");
    assert!(query.contains("\"events\".\"organization_id\" = $2"), "{query}");
    assert!(query.contains("ORDER BY \"events\".\"start_date\" ASC"), "{query}");
}
