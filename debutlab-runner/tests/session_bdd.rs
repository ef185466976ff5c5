//! BDD tests for sessions: run, reset, and export.
//!
//! These tests verify the explorer's interaction contract:
//! - Criteria are held until a run is triggered, then re-filter live
//! - Reset returns to the freshly loaded state without refetching
//! - Export works for empty results and is byte-stable across reruns

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use debutlab_core::{AgeRange, Criteria, Highlight, Selection};
use debutlab_runner::{
    AppConfig, FileSource, LoadError, RawSource, RunRequest, Session, EXPORT_CONTENT_TYPE,
    EXPORT_FILE_NAME,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/debutants_sample.csv")
}

fn load_fixture() -> Session {
    Session::load(&FileSource::new(fixture()), &AppConfig::default()).unwrap()
}

/// Counts fetches so tests can prove the canonical table is not rebuilt.
struct CountingSource {
    inner: FileSource,
    fetches: AtomicUsize,
}

impl RawSource for CountingSource {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch()
    }
}

#[test]
fn bdd_scenario_filters_wait_for_the_run_trigger() {
    // GIVEN a loaded session
    let mut session = load_fixture();

    // WHEN criteria are set without pressing run
    let criteria = Criteria {
        age: Some(AgeRange::new(18, 23)),
        ..Default::default()
    };
    let outcome = session.submit(RunRequest::hold(criteria.clone()));

    // THEN nothing is shown but the criteria are held
    assert!(outcome.is_none());
    assert_eq!(session.criteria(), &criteria);

    // WHEN run is pressed
    let outcome = session.submit(RunRequest::run(criteria)).unwrap();

    // THEN the 18, 19 and 23 year olds are shown
    assert_eq!(outcome.row_count, 3);
}

#[test]
fn bdd_scenario_filter_changes_after_run_refilter_live() {
    // GIVEN a session where run has been pressed once
    let mut session = load_fixture();
    let outcome = session.submit(RunRequest::run(Criteria::default())).unwrap();
    assert_eq!(outcome.row_count, 5);

    // WHEN the age range changes without pressing run again
    let outcome = session
        .submit(RunRequest::hold(Criteria {
            age: Some(AgeRange::new(18, 23)),
            ..Default::default()
        }))
        .unwrap();

    // THEN the table reflects the new criteria
    assert_eq!(outcome.row_count, 3);

    // WHEN the session is reset and criteria change again
    session.reset();
    let outcome = session.submit(RunRequest::hold(Criteria {
        age: Some(AgeRange::new(16, 17)),
        ..Default::default()
    }));

    // THEN nothing runs until run is pressed again
    assert!(outcome.is_none());
}

#[test]
fn bdd_scenario_german_bundesliga_is_distinct_from_austrian() {
    // GIVEN a loaded session
    let mut session = load_fixture();

    // WHEN selecting the German top flight by its compound key
    let criteria = Criteria {
        competitions: Selection::from_values(["1. Bundesliga|Germany"]),
        ..Default::default()
    };
    let outcome = session.submit(RunRequest::run(criteria)).unwrap();

    // THEN only the German debut is shown, flagged as a value increase
    assert_eq!(outcome.row_count, 1);
    let row = &outcome.table.rows[0];
    assert_eq!(row.record.player_name.as_deref(), Some("Jonas Weber"));
    assert_eq!(row.record.display_label.as_deref(), Some("1. Bundesliga (Germany)"));
    assert_eq!(outcome.annotation.get(0), Some(Highlight::Increased));
}

#[test]
fn bdd_scenario_reset_does_not_refetch() {
    // GIVEN a session loaded from a counting source
    let source = CountingSource {
        inner: FileSource::new(fixture()),
        fetches: AtomicUsize::new(0),
    };
    let mut session = Session::load(&source, &AppConfig::default()).unwrap();
    session.submit(RunRequest::run(Criteria {
        min_minutes: Some(1_000),
        ..Default::default()
    }));

    // WHEN the user clears
    session.reset();

    // THEN the session is back to its loaded state, with no second fetch
    assert!(session.outcome().is_none());
    assert_eq!(session.criteria(), &Criteria::default());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

    // AND a new run sees the full table again
    let outcome = session.submit(RunRequest::run(Criteria::default())).unwrap();
    assert_eq!(outcome.row_count, 5);
}

#[test]
fn bdd_scenario_empty_result_exports_header_only() {
    // GIVEN criteria that match nothing
    let mut session = load_fixture();
    let outcome = session
        .submit(RunRequest::run(Criteria {
            min_minutes: Some(1_000_000),
            ..Default::default()
        }))
        .unwrap();
    assert_eq!(outcome.row_count, 0);

    // WHEN exporting
    let artifact = session.export().unwrap();

    // THEN the file holds just the header row
    let text = String::from_utf8(artifact.bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Competition,Country,Player Name,"));
    assert_eq!(artifact.file_name, EXPORT_FILE_NAME);
    assert_eq!(artifact.content_type, EXPORT_CONTENT_TYPE);
}

#[test]
fn bdd_scenario_rerun_exports_identical_bytes() {
    // GIVEN a session and a criteria set
    let mut session = load_fixture();
    let criteria = Criteria {
        months: Selection::from_values(["August", "January", "October"]),
        ..Default::default()
    };

    // WHEN the same run happens twice
    let first_table = session.submit(RunRequest::run(criteria.clone())).unwrap().table.clone();
    let first = session.export().unwrap();
    let second_table = session.submit(RunRequest::run(criteria)).unwrap().table.clone();
    let second = session.export().unwrap();

    // THEN presentation and export are identical
    assert_eq!(first_table, second_table);
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first_table.row_count(), 3);
}

#[test]
fn bdd_scenario_export_keeps_numbers_machine_readable() {
    // GIVEN a run over the whole table
    let mut session = load_fixture();
    session.submit(RunRequest::run(Criteria::default()));

    // WHEN exporting
    let artifact = session.export().unwrap();

    // THEN money and change columns hold plain numbers
    let mut reader = csv::Reader::from_reader(artifact.bytes.as_slice());
    let headers = reader.headers().unwrap().clone();
    let value_col = headers.iter().position(|h| h == "Current Market Value").unwrap();
    let change_col = headers.iter().position(|h| h == "Value Change").unwrap();
    let date_col = headers.iter().position(|h| h == "Debut Date").unwrap();

    let first = reader.records().next().unwrap().unwrap();
    assert_eq!(&first[value_col], "1500000");
    assert_eq!(&first[change_col], "500.0");
    assert_eq!(&first[date_col], "2022-08-06");
}
