// tests/daily_runner.rs
//
// Daily stats decision against a real on-disk store.

use chrono::NaiveDate;
use outbreak_notifier::notify::MessageTemplate;
use outbreak_notifier::runner::DailyStatsRunner;
use outbreak_notifier::stats::day::RunDays;
use outbreak_notifier::{Outcome, RecordStore, Runner, Snapshot, SuppressReason};

fn days() -> RunDays {
    RunDays::for_date(NaiveDate::from_ymd_opt(2020, 4, 2).unwrap())
}

fn template() -> MessageTemplate {
    MessageTemplate {
        title: ":flag_pt: Portugal".into(),
        content: None,
        lines_before: vec!["https://covid19.min-saude.pt/".into()],
        lines_after: vec![],
    }
}

fn open(dir: &tempfile::TempDir) -> RecordStore {
    RecordStore::open(dir.path().join("portugal.json")).unwrap()
}

#[test]
fn empty_store_records_today_but_stays_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    let latest = Snapshot::new(100, 1, 50, 49);

    let out = DailyStatsRunner::default()
        .decide(&latest, &mut store, &days(), &template())
        .unwrap();

    assert_eq!(out, Outcome::Suppressed(SuppressReason::NoBaseline));
    let rec = store.find("2020-04-02").expect("today recorded");
    assert_eq!(rec.snapshot, latest);
    assert_eq!(store.len(), 1);
}

#[test]
fn change_since_yesterday_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.add("2020-04-01", Snapshot::new(80, 1, 40, 39)).unwrap();

    let latest = Snapshot::new(100, 1, 50, 49);
    let out = DailyStatsRunner::default()
        .decide(&latest, &mut store, &days(), &template())
        .unwrap();

    let n = out.notification().expect("notification emitted");
    assert_eq!(n.embeds[0].title, ":flag_pt: Portugal");
    let text = n.description();
    assert!(text.starts_with("https://covid19.min-saude.pt/\n \n"), "{text}");
    assert!(text.contains(":radioactive: 100 cases, **+20**"), "{text}");
    assert!(text.contains(":skull_crossbones: 1 deaths, **+0**"), "{text}");
    assert!(text.contains(":house_with_garden: 50 recoveries, **+10**"), "{text}");
    assert!(text.contains(":zombie: 49 active, **+10**"), "{text}");
    // no record two days back: no trend glyphs
    assert!(!text.contains("triangle"), "{text}");
    assert!(!text.contains(":red_circle:"), "{text}");
}

#[test]
fn trend_glyphs_appear_with_two_days_of_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.add("2020-03-31", Snapshot::new(1_000, 10, 100, 890)).unwrap();
    store.add("2020-04-01", Snapshot::new(1_100, 11, 110, 979)).unwrap();

    // cases +20% vs +10% the day before; deaths +0% vs +10%; recoveries +10% vs +10%
    let latest = Snapshot::new(1_320, 11, 121, 1_188);
    let out = DailyStatsRunner::default()
        .decide(&latest, &mut store, &days(), &template())
        .unwrap();
    let text = out.notification().unwrap().description().to_string();

    assert!(text.contains(":radioactive: 1 320 cases, **+220** :small_red_triangle:"), "{text}");
    assert!(text.contains(":skull_crossbones: 11 deaths, **+0** :small_red_triangle_down:"), "{text}");
    assert!(text.contains(":house_with_garden: 121 recoveries, **+11** :red_circle:"), "{text}");
}

#[test]
fn unchanged_resubmission_is_suppressed_and_leaves_record_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.add("2020-04-01", Snapshot::new(80, 1, 40, 39)).unwrap();
    let runner = DailyStatsRunner::default();
    let latest = Snapshot::new(100, 1, 50, 49);

    let first = runner.decide(&latest, &mut store, &days(), &template()).unwrap();
    assert!(first.notification().is_some());
    let after_first = store.find("2020-04-02").unwrap().clone();

    let second = runner.decide(&latest, &mut store, &days(), &template()).unwrap();
    assert_eq!(second, Outcome::Suppressed(SuppressReason::Unchanged));
    let after_second = store.find("2020-04-02").unwrap();
    assert_eq!(after_second, &after_first);
    assert_eq!(after_second.updated_at, None);
}

#[test]
fn same_day_change_updates_and_reports_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.add("2020-04-01", Snapshot::new(80, 1, 40, 39)).unwrap();
    let runner = DailyStatsRunner::default();

    runner
        .decide(&Snapshot::new(100, 1, 50, 49), &mut store, &days(), &template())
        .unwrap();
    let out = runner
        .decide(&Snapshot::new(130, 2, 50, 78), &mut store, &days(), &template())
        .unwrap();

    let text = out.notification().unwrap().description();
    assert!(text.contains(":radioactive: 130 cases, **+50**"), "{text}");
    let rec = store.find("2020-04-02").unwrap();
    assert_eq!(rec.snapshot.cases, 130);
    assert!(rec.updated_at.is_some());
}

#[test]
fn forced_rerun_re_emits_the_same_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.add("2020-04-01", Snapshot::new(80, 1, 40, 39)).unwrap();
    let runner = DailyStatsRunner::new(true);
    let latest = Snapshot::new(100, 1, 50, 49);

    let first = runner.decide(&latest, &mut store, &days(), &template()).unwrap();
    let second = runner.decide(&latest, &mut store, &days(), &template()).unwrap();
    assert!(first.notification().is_some());
    assert_eq!(first, second);
    assert!(store.find("2020-04-02").unwrap().updated_at.is_some());
}

#[test]
fn zero_counters_are_omitted_and_negative_deltas_signed() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.add("2020-04-01", Snapshot::new(5_000, 100, 0, 4_900)).unwrap();

    let latest = Snapshot::new(5_000, 100, 0, 4_100);
    let out = DailyStatsRunner::default()
        .decide(&latest, &mut store, &days(), &template())
        .unwrap();
    let text = out.notification().unwrap().description();
    assert!(!text.contains("recoveries"), "{text}");
    assert!(text.contains(":zombie: 4 100 active, **-800**"), "{text}");
}
