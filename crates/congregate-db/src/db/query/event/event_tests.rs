//! Unit tests for event query builders.

use chrono::TimeZone;
use diesel::query_builder::QueryFragment;

use super::*;

/// Renders a query to SQL.
fn sql<Q>(query: Q) -> String
where
    Q: QueryFragment<diesel::pg::Pg>,
{
    diesel::debug_query::<diesel::pg::Pg, _>(&query).to_string()
}

#[test]
fn test_by_organization_query_builds() {
    let query = sql(by_organization(Uuid::new_v4()));
    assert!(query.contains("\"events\".\"organization_id\" = $1"), "{query}");
}

#[test]
fn test_by_id_query_is_scoped() {
    let query = sql(by_id(Uuid::new_v4(), "sunday-service-1704621600000"));
    assert!(query.contains("\"events\".\"organization_id\" = $1"), "{query}");
    assert!(query.contains("\"events\".\"id\" = $2"), "{query}");
}

#[test]
fn test_by_parent_query_orders_by_start() {
    let query = sql(by_parent(Uuid::new_v4(), "master"));
    assert!(query.contains("\"events\".\"parent_event_id\" = $2"), "{query}");
    assert!(query.contains("ORDER BY \"events\".\"start_date\" ASC"), "{query}");
}

#[test]
fn test_listing_applies_optional_filters() {
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let query = sql(listing(Uuid::new_v4(), Some(from), Some(true), Some(5)));
    assert!(query.contains("\"events\".\"start_date\" >= $2"), "{query}");
    assert!(query.contains("\"events\".\"needs_volunteers\" = $3"), "{query}");
    assert!(query.contains("LIMIT $4"), "{query}");
}

#[test]
fn test_listing_without_filters_only_scopes_organization() {
    let query = sql(listing(Uuid::new_v4(), None, None, None));
    assert!(!query.contains("start_date\" >="), "{query}");
    assert!(!query.contains("LIMIT"), "{query}");
    assert!(
        query.contains("ORDER BY \"events\".\"start_date\" ASC, \"events\".\"id\" ASC"),
        "{query}"
    );
}
