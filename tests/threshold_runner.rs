// tests/threshold_runner.rs
//
// Milestone reporting across several simulated days.

use chrono::{Days, NaiveDate};
use outbreak_notifier::notify::MessageTemplate;
use outbreak_notifier::runner::ThresholdRunner;
use outbreak_notifier::stats::day::RunDays;
use outbreak_notifier::stats::threshold::ThresholdTracker;
use outbreak_notifier::{Outcome, RecordStore, Runner, Snapshot, SuppressReason};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 20).unwrap()
}

fn world_template() -> MessageTemplate {
    MessageTemplate {
        title: ":globe_with_meridians: World".into(),
        content: None,
        lines_before: vec![
            "The number of worldwide cases has grown by at least 1 million.".into(),
            "It took **{time}** to reach from **{valueBefore}m** to **{valueNow}m**.".into(),
        ],
        lines_after: vec![],
    }
}

fn cases(n: i64) -> Snapshot {
    Snapshot::new(n, n / 20, n / 4, n - n / 20 - n / 4)
}

#[test]
fn crossing_a_million_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("world.json")).unwrap();
    let today = start();
    store.add(&RunDays::for_date(today).yesterday, cases(900_000)).unwrap();

    let out = ThresholdRunner::default()
        .decide(&cases(1_050_000), &mut store, &RunDays::for_date(today), &world_template())
        .unwrap();

    let text = out.notification().expect("milestone reported").description();
    assert!(text.contains("It took **1 day** to reach from **0m** to **1m**."), "{text}");
    assert!(text.contains(":radioactive: **1 050 000** cases"), "{text}");
}

#[test]
fn first_day_has_no_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("world.json")).unwrap();

    let out = ThresholdRunner::default()
        .decide(&cases(1_050_000), &mut store, &RunDays::for_date(start()), &world_template())
        .unwrap();
    assert_eq!(out, Outcome::Suppressed(SuppressReason::NoBaseline));
    assert_eq!(store.len(), 1);
}

#[test]
fn each_bucket_is_reported_once_with_elapsed_days() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("world.json")).unwrap();
    let runner = ThresholdRunner::default();
    let tracker = ThresholdTracker::new(1_000_000);

    // (day offset, cases); several observations per day, non-decreasing
    let observations: &[(u64, i64)] = &[
        (0, 400_000),
        (1, 600_000),
        (1, 650_000),
        (2, 800_000),
        (3, 950_000),
        (3, 1_001_000),
        (3, 1_002_000),
        (4, 1_300_000),
        (5, 1_700_000),
        (6, 2_050_000),
        (6, 2_050_000),
        (7, 2_100_000),
        (8, 3_400_000),
    ];

    let mut emitted = Vec::new();
    for &(offset, n) in observations {
        let date = start().checked_add_days(Days::new(offset)).unwrap();
        let days = RunDays::for_date(date);
        let scaled_yesterday = store.find(&days.yesterday).map(|r| tracker.scaled_value(&r.snapshot));

        let out = runner
            .decide(&cases(n), &mut store, &days, &world_template())
            .unwrap();

        if let Outcome::Emit(note) = out {
            let scaled_today = tracker.scaled_value(&cases(n));
            let from = scaled_yesterday.expect("emits only with a baseline");
            let expected = tracker.elapsed_days(store.scan_ascending(), from, scaled_today);
            emitted.push((offset, scaled_today, expected, note.description().to_string()));
        }
    }

    let buckets: Vec<i64> = emitted.iter().map(|e| e.1).collect();
    assert_eq!(buckets, vec![1, 2, 3]);
    assert_eq!(emitted[0].0, 3);
    assert_eq!(emitted[1].0, 6);
    assert_eq!(emitted[2].0, 8);

    // days in bucket 0 before the first million: offsets 0, 1, 2
    assert_eq!(emitted[0].2, 3);
    assert!(emitted[0].3.contains("**3 days** to reach from **0m** to **1m**"), "{}", emitted[0].3);
    // bucket 1: offsets 3, 4, 5
    assert_eq!(emitted[1].2, 3);
    // bucket 2 only: offsets 6 and 7 (3.4m skips straight past 3m)
    assert_eq!(emitted[2].2, 2);
    assert!(emitted[2].3.contains("from **2m** to **3m**"), "{}", emitted[2].3);
}

#[test]
fn drop_below_yesterday_is_not_a_crossing() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("world.json")).unwrap();
    let days = RunDays::for_date(start());
    store.add(&days.yesterday, cases(2_100_000)).unwrap();

    let out = ThresholdRunner::default()
        .decide(&cases(1_900_000), &mut store, &days, &world_template())
        .unwrap();
    assert_eq!(out, Outcome::Suppressed(SuppressReason::NoCrossing));
}

#[test]
fn custom_scale_factor() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("pt.json")).unwrap();
    let days = RunDays::for_date(start());
    store.add(&days.yesterday, cases(9_990)).unwrap();

    let out = ThresholdRunner::new(10_000, false)
        .decide(&cases(10_010), &mut store, &days, &MessageTemplate::default())
        .unwrap();
    assert!(out.notification().is_some());
}
