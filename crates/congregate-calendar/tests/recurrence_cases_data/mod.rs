use chrono::{DateTime, Utc};

pub struct RecurrenceCase {
    pub name: &'static str,
    pub pattern: &'static str,
    pub monthly_week: Option<i32>,
    pub monthly_weekday: Option<i32>,
    pub timezone: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub horizon: &'static str,
    /// Leading instance starts, in order.
    pub expected: &'static [&'static str],
    pub expected_len: usize,
}

pub fn parse_rfc3339(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Invalid timestamp {value}: {err}"))
        .with_timezone(&Utc)
}

#[expect(clippy::too_many_lines)]
pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "daily_leap_year",
            pattern: "daily",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-01-01T10:00:00Z",
            end: "2024-01-01T11:00:00Z",
            horizon: "2025-01-01T00:00:00Z",
            expected: &["2024-01-01T10:00:00Z", "2024-01-02T10:00:00Z"],
            expected_len: 366,
        },
        RecurrenceCase {
            name: "daily_horizon_is_inclusive",
            pattern: "daily",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-01-01T10:00:00Z",
            end: "2024-01-01T11:00:00Z",
            horizon: "2025-01-01T10:00:00Z",
            expected: &["2024-01-01T10:00:00Z", "2024-01-02T10:00:00Z"],
            expected_len: 367,
        },
        RecurrenceCase {
            name: "daily_common_year",
            pattern: "daily",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2025-01-01T10:00:00Z",
            end: "2025-01-01T11:00:00Z",
            horizon: "2026-01-01T09:00:00Z",
            expected: &["2025-01-01T10:00:00Z"],
            expected_len: 365,
        },
        RecurrenceCase {
            name: "weekly_horizon_inclusive",
            pattern: "weekly",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-01-07T10:00:00Z",
            end: "2024-01-07T11:30:00Z",
            horizon: "2024-02-04T10:00:00Z",
            expected: &[
                "2024-01-07T10:00:00Z",
                "2024-01-14T10:00:00Z",
                "2024-01-21T10:00:00Z",
                "2024-01-28T10:00:00Z",
                "2024-02-04T10:00:00Z",
            ],
            expected_len: 5,
        },
        RecurrenceCase {
            name: "biweekly",
            pattern: "biweekly",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-01-03T18:00:00Z",
            end: "2024-01-03T19:00:00Z",
            horizon: "2024-03-01T00:00:00Z",
            expected: &[
                "2024-01-03T18:00:00Z",
                "2024-01-17T18:00:00Z",
                "2024-01-31T18:00:00Z",
                "2024-02-14T18:00:00Z",
                "2024-02-28T18:00:00Z",
            ],
            expected_len: 5,
        },
        RecurrenceCase {
            name: "monthly_clamps_short_months",
            pattern: "monthly",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-01-31T09:00:00Z",
            end: "2024-01-31T10:00:00Z",
            horizon: "2024-06-30T00:00:00Z",
            expected: &[
                "2024-01-31T09:00:00Z",
                "2024-02-29T09:00:00Z",
                "2024-03-29T09:00:00Z",
                "2024-04-29T09:00:00Z",
                "2024-05-29T09:00:00Z",
                "2024-06-29T09:00:00Z",
            ],
            expected_len: 6,
        },
        RecurrenceCase {
            name: "last_friday",
            pattern: "monthly_weekday",
            monthly_week: Some(5),
            monthly_weekday: Some(5),
            timezone: "UTC",
            start: "2024-01-05T19:00:00Z",
            end: "2024-01-05T21:00:00Z",
            horizon: "2024-04-30T00:00:00Z",
            expected: &[
                "2024-01-05T19:00:00Z",
                "2024-02-23T19:00:00Z",
                "2024-03-29T19:00:00Z",
                "2024-04-26T19:00:00Z",
            ],
            expected_len: 4,
        },
        RecurrenceCase {
            name: "second_tuesday_across_dst",
            pattern: "monthly_weekday",
            monthly_week: Some(2),
            monthly_weekday: Some(2),
            timezone: "America/Chicago",
            start: "2024-01-09T16:00:00Z",
            end: "2024-01-09T17:00:00Z",
            horizon: "2024-04-30T00:00:00Z",
            expected: &[
                "2024-01-09T16:00:00Z",
                "2024-02-13T16:00:00Z",
                "2024-03-12T15:00:00Z",
                "2024-04-09T15:00:00Z",
            ],
            expected_len: 4,
        },
        RecurrenceCase {
            name: "unrecognized_steps_weekly",
            pattern: "quarterly",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-01-01T00:00:00Z",
            end: "2024-01-01T01:00:00Z",
            horizon: "2024-01-20T00:00:00Z",
            expected: &[
                "2024-01-01T00:00:00Z",
                "2024-01-08T00:00:00Z",
                "2024-01-15T00:00:00Z",
            ],
            expected_len: 3,
        },
        RecurrenceCase {
            name: "start_after_horizon",
            pattern: "weekly",
            monthly_week: None,
            monthly_weekday: None,
            timezone: "UTC",
            start: "2024-06-01T10:00:00Z",
            end: "2024-06-01T11:00:00Z",
            horizon: "2024-05-01T00:00:00Z",
            expected: &[],
            expected_len: 0,
        },
    ]
}

/// Checks the starts produced for `case` against its expectations.
pub fn assert_starts(case: &RecurrenceCase, actual: &[DateTime<Utc>]) {
    assert_eq!(
        actual.len(),
        case.expected_len,
        "Case {} expected {} occurrences",
        case.name,
        case.expected_len
    );

    let expected: Vec<DateTime<Utc>> = case.expected.iter().map(|value| parse_rfc3339(value)).collect();
    assert_eq!(
        &actual[..expected.len()],
        expected.as_slice(),
        "Case {} did not match",
        case.name
    );

    assert!(
        actual.windows(2).all(|pair| pair[0] < pair[1]),
        "Case {} is not strictly increasing",
        case.name
    );
}
