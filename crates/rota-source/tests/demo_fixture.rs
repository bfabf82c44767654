// The shipped demo fixture must stay loadable by the static source.

use chrono::{TimeZone, Utc};
use rota_core::types::{Period, ScheduleId};
use rota_source::{fetch_schedules, StaticSource};

#[tokio::test]
async fn demo_fixture_loads_and_fans_out() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/schedules.json");
    let source = StaticSource::from_file(path).unwrap();

    let window = Period::new(
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 8, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let ids: Vec<ScheduleId> = vec!["PLATFORM".into(), "PAYMENTS".into()];
    let outcome = fetch_schedules(&source, &ids, window, 2).await.unwrap();

    assert!(outcome.failed.is_empty());
    let intervals = outcome.intervals();
    assert!(intervals.iter().all(|iv| iv.end <= window.end && iv.start >= window.start));
    // Grace's shift runs past the window and is clipped
    let grace = intervals.iter().find(|iv| iv.person_id.as_str() == "U2").unwrap();
    assert_eq!(grace.end, window.end);
}
