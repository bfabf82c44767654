// Behavioural properties of overlap attribution, checked end to end
// through the public API with the calendar-day classifier.

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use rota_attribution::{
    CalendarDayClassifier, CompensableUnitClassifier, OverlapAttributionEngine, TimezonePolicy,
};
use rota_core::types::{AssignmentInterval, Rates, ScheduleCompensationReport, ScheduleMetadata};

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn schedule(id: &str) -> ScheduleMetadata {
    ScheduleMetadata {
        id: id.into(),
        display_name: format!("Team {id}"),
        external_url: format!("https://acme.pagerduty.com/schedules/{id}"),
        timezone: "UTC".into(),
    }
}

fn assignment(person: &str, sched: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> AssignmentInterval {
    AssignmentInterval {
        person_id: person.into(),
        person_display_name: person.to_uppercase(),
        schedule_id: sched.into(),
        start,
        end,
    }
}

fn engine() -> OverlapAttributionEngine {
    OverlapAttributionEngine::new(Box::new(CalendarDayClassifier::new()), TimezonePolicy::FirstActive)
}

fn line<'a>(
    reports: &'a [ScheduleCompensationReport],
    sched: &str,
    person: &str,
) -> Option<&'a rota_core::types::EmployeeCompensationLine> {
    reports
        .iter()
        .find(|r| r.metadata.id.as_str() == sched)?
        .employees
        .iter()
        .find(|e| e.person_id.as_str() == person)
}

#[test]
fn equal_split_of_identical_saturday() {
    let start = utc(2026, 1, 3, 0);
    let end = utc(2026, 1, 4, 0);
    let reports = engine()
        .attribute(
            &[schedule("S1"), schedule("S2")],
            &[
                assignment("U1", "S1", start, end),
                assignment("U1", "S2", start, end),
            ],
            Rates::default(),
        )
        .unwrap();

    let full = CalendarDayClassifier::new().classify(start, end, Tz::UTC);
    let s1 = line(&reports, "S1", "U1").unwrap();
    let s2 = line(&reports, "S2", "U1").unwrap();

    assert_eq!(s1.weekend_units, s2.weekend_units);
    assert_eq!(s1.weekend_units + s2.weekend_units, full.weekend_units);
    assert_eq!(s1.weekend_units, 0.5);
    assert_eq!(s1.total_compensation, 37.5);
    assert!(s1.is_overlapping);
    assert!(s2.is_overlapping);
}

#[test]
fn three_way_split_of_one_hour() {
    let start = utc(2026, 1, 6, 14);
    let end = utc(2026, 1, 6, 15);
    // a day rate of 72 makes one hour worth exactly 3.00
    let rates = Rates::new(72.0, 72.0);
    let reports = engine()
        .attribute(
            &[schedule("A"), schedule("B"), schedule("C")],
            &[
                assignment("U1", "A", start, end),
                assignment("U1", "B", start, end),
                assignment("U1", "C", start, end),
            ],
            rates,
        )
        .unwrap();

    let amounts: Vec<f64> = ["A", "B", "C"]
        .iter()
        .map(|s| line(&reports, s, "U1").unwrap().total_compensation)
        .collect();
    assert_eq!(amounts, vec![1.0, 1.0, 1.0]);
    assert!((amounts.iter().sum::<f64>() - 3.0).abs() < 1e-9);
}

#[test]
fn single_schedule_matches_direct_classification() {
    let start = utc(2026, 1, 2, 18);
    let end = utc(2026, 1, 5, 8);
    let reports = engine()
        .attribute(&[schedule("S1")], &[assignment("U1", "S1", start, end)], Rates::default())
        .unwrap();
    let direct = CalendarDayClassifier::new().classify(start, end, Tz::UTC);
    let got = line(&reports, "S1", "U1").unwrap();
    assert_eq!(got.weekday_units, (direct.weekday_units * 100.0).round() / 100.0);
    assert_eq!(got.weekend_units, (direct.weekend_units * 100.0).round() / 100.0);
    assert!(!got.is_overlapping);
}

#[test]
fn overlap_flag_requires_nonzero_time_in_two_schedules() {
    // U1 touches S2 only with a zero-length entry
    let reports = engine()
        .attribute(
            &[schedule("S1"), schedule("S2")],
            &[
                assignment("U1", "S1", utc(2026, 1, 5, 0), utc(2026, 1, 6, 0)),
                assignment("U1", "S2", utc(2026, 1, 5, 3), utc(2026, 1, 5, 3)),
            ],
            Rates::default(),
        )
        .unwrap();
    assert!(!line(&reports, "S1", "U1").unwrap().is_overlapping);
    assert!(line(&reports, "S2", "U1").is_none());
}

#[test]
fn rerun_is_bit_identical() {
    let schedules = [schedule("S1"), schedule("S2"), schedule("S3")];
    let intervals = [
        assignment("U1", "S1", utc(2026, 1, 1, 7), utc(2026, 1, 4, 19)),
        assignment("U1", "S2", utc(2026, 1, 3, 2), utc(2026, 1, 8, 0)),
        assignment("U2", "S3", utc(2026, 1, 2, 0), utc(2026, 1, 3, 0)),
        assignment("U1", "S3", utc(2026, 1, 3, 13), utc(2026, 1, 3, 17)),
    ];
    let rates = Rates::new(33.3, 71.7);
    let e = engine();
    let first = e.attribute(&schedules, &intervals, rates).unwrap();
    let second = e.attribute(&schedules, &intervals, rates).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn compensation_always_has_two_decimals() {
    let reports = engine()
        .attribute(
            &[schedule("S1"), schedule("S2"), schedule("S3")],
            &[
                assignment("U1", "S1", utc(2026, 1, 5, 0), utc(2026, 1, 5, 7)),
                assignment("U1", "S2", utc(2026, 1, 5, 1), utc(2026, 1, 5, 7)),
                assignment("U1", "S3", utc(2026, 1, 5, 2), utc(2026, 1, 5, 7)),
            ],
            Rates::new(13.37, 17.0),
        )
        .unwrap();
    for report in &reports {
        for e in &report.employees {
            for v in [e.total_compensation, e.weekday_units, e.weekend_units] {
                assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6, "{v} not in cents");
            }
        }
    }
}

// Random layouts of one person across up to four schedules, hour-granular
// within two weeks of January 2026.
fn layouts() -> impl Strategy<Value = Vec<(usize, u32, u32)>> {
    prop::collection::vec((0usize..4, 0u32..336, 1u32..72), 1..12)
}

proptest! {
    #[test]
    fn total_units_are_overlap_invariant(layout in layouts()) {
        let base = utc(2026, 1, 1, 0);
        let ids = ["S0", "S1", "S2", "S3"];
        let schedules: Vec<_> = ids.iter().map(|id| schedule(id)).collect();
        let intervals: Vec<_> = layout
            .iter()
            .map(|&(s, offset, len)| {
                let start = base + Duration::hours(offset as i64);
                assignment("U1", ids[s], start, start + Duration::hours(len as i64))
            })
            .collect();

        let reports = engine().attribute(&schedules, &intervals, Rates::default()).unwrap();
        let attributed: f64 = reports
            .iter()
            .flat_map(|r| r.employees.iter())
            .map(|e| e.weekday_units + e.weekend_units)
            .sum();

        // The same coverage collapsed into one schedule is never split.
        let merged: Vec<_> = intervals
            .iter()
            .map(|iv| assignment("U1", "S0", iv.start, iv.end))
            .collect();
        let single = engine().attribute(&schedules[..1], &merged, Rates::default()).unwrap();
        let expected: f64 = single[0]
            .employees
            .iter()
            .map(|e| e.weekday_units + e.weekend_units)
            .sum();

        // each of up to 4 schedules x 2 unit kinds rounds by at most half a cent
        let tolerance = 0.005 * 8.0 + 0.005 * 2.0 + 1e-9;
        prop_assert!((attributed - expected).abs() <= tolerance,
            "attributed {attributed} vs single-schedule {expected}");
    }
}
