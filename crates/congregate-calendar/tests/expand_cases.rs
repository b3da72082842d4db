use chrono_tz::Tz;
use congregate_calendar::{EventRule, Recurrence, expand};

include!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/recurrence_cases_data/mod.rs"));

#[test_log::test]
fn recurrence_cases_expand() {
    for case in recurrence_cases() {
        let recurrence = Recurrence::from_parts(case.pattern, case.monthly_week, case.monthly_weekday)
            .unwrap_or_else(|err| panic!("Case {} has an invalid rule: {err}", case.name));
        let timezone: Tz = case.timezone.parse().expect("known zone");
        let start = parse_rfc3339(case.start);
        let end = parse_rfc3339(case.end);
        let rule = EventRule::new("master", start, end, recurrence, timezone);

        let instances = expand(&rule, parse_rfc3339(case.horizon));

        let starts: Vec<_> = instances.iter().map(|instance| instance.start).collect();
        assert_starts(&case, &starts);
        assert!(
            instances.iter().all(|instance| instance.end - instance.start == end - start),
            "Case {} changed the duration",
            case.name
        );
        assert!(
            instances.iter().all(|instance| instance.parent_event_id == "master"),
            "Case {} lost the parent reference",
            case.name
        );
    }
}
