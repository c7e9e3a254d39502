//! Tests for the folder loader

use super::*;
use crate::database::{DatabaseEngine, DatabaseUrl};
use crate::error::Error;
use crate::source::discover_csv_files;
use crate::types::{LoadPolicy, TableCase};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

fn memory_engine() -> DatabaseEngine {
    let url = DatabaseUrl::parse("duckdb://:memory:").unwrap();
    DatabaseEngine::connect(&url, None).unwrap()
}

fn folder(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn run(
    engine: &DatabaseEngine,
    dir: &Path,
    policy: LoadPolicy,
    case: TableCase,
) -> (crate::error::Result<LoadReport>, Vec<LoadEvent>) {
    let sources = discover_csv_files(dir).unwrap();
    let mut events = Vec::new();
    let result = FolderLoader::new(engine, policy, case).run(&sources, &mut |e: &LoadEvent| {
        events.push(e.clone());
    });
    (result, events)
}

// ============================================================================
// Drop and Reload
// ============================================================================

#[test]
fn test_drop_reload_loads_every_file() {
    let dir = folder(&[
        ("Vaccinations.csv", "country,year,doses\nIN,2021,100\nIN,2022,250\nUS,2021,90\n"),
        ("coverage.csv", "country,pct\nIN,71.5\n"),
        ("readme.md", "not data"),
    ]);
    let engine = memory_engine();

    let (report, events) = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower);
    let report = report.unwrap();

    assert_eq!(report.uploaded_tables(), vec!["vaccinations", "coverage"]);
    assert_eq!(report.total_rows(), 4);
    assert_eq!(report.dropped_count(), 0);
    assert_eq!(engine.list_tables().unwrap(), vec!["coverage", "vaccinations"]);
    assert_eq!(engine.row_count("vaccinations").unwrap(), 3);
    assert_eq!(
        engine.table_columns("vaccinations").unwrap(),
        vec!["country", "year", "doses"]
    );

    assert_eq!(
        events[0],
        LoadEvent::Dropped {
            table: "vaccinations".into(),
            existed: false
        }
    );
    assert_eq!(
        events[1],
        LoadEvent::Uploading {
            file: "Vaccinations.csv".into(),
            table: "vaccinations".into()
        }
    );
}

#[test]
fn test_drop_reload_is_idempotent() {
    let dir = folder(&[("a.csv", "x,y\n1,2\n3,4\n"), ("b.csv", "z\nq\n")]);
    let engine = memory_engine();

    let first = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();
    let second = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();

    assert_eq!(first.dropped_count(), 0);
    assert_eq!(second.dropped_count(), 2);
    assert_eq!(first.total_rows(), second.total_rows());
    assert_eq!(engine.list_tables().unwrap(), vec!["a", "b"]);
    assert_eq!(engine.row_count("a").unwrap(), 2);
    assert_eq!(engine.row_count("b").unwrap(), 1);
}

// ============================================================================
// Skip Existing
// ============================================================================

#[test]
fn test_skip_existing_second_run_writes_nothing() {
    let dir = folder(&[("a.csv", "x\n1\n"), ("b.csv", "x\n1\n2\n")]);
    let engine = memory_engine();

    let first = run(&engine, dir.path(), LoadPolicy::SkipExisting, TableCase::Lower)
        .0
        .unwrap();
    assert_eq!(first.uploaded_count(), 2);
    assert_eq!(first.skipped_count(), 0);

    let (second, events) = run(&engine, dir.path(), LoadPolicy::SkipExisting, TableCase::Lower);
    let second = second.unwrap();

    assert_eq!(second.uploaded_count(), 0);
    assert_eq!(second.skipped_count(), 2);
    assert_eq!(second.total_rows(), 0);
    assert!(events
        .iter()
        .all(|e| matches!(e, LoadEvent::Skipped { .. })));
}

#[test]
fn test_skip_existing_loads_only_new_tables() {
    let dir = folder(&[("a.csv", "x\n1\n")]);
    let engine = memory_engine();
    run(&engine, dir.path(), LoadPolicy::SkipExisting, TableCase::Lower)
        .0
        .unwrap();

    fs::write(dir.path().join("a.csv"), "x\n1\n2\n3\n").unwrap();
    fs::write(dir.path().join("new.csv"), "y\n9\n").unwrap();

    let report = run(&engine, dir.path(), LoadPolicy::SkipExisting, TableCase::Lower)
        .0
        .unwrap();

    assert_eq!(report.uploaded_tables(), vec!["new"]);
    assert_eq!(report.skipped_count(), 1);
    // The existing table keeps its original contents.
    assert_eq!(engine.row_count("a").unwrap(), 1);
}

// ============================================================================
// Overwrite
// ============================================================================

#[test]
fn test_overwrite_replaces_without_drop_events() {
    let dir = folder(&[("t.csv", "a,b\n1,2\n")]);
    let engine = memory_engine();
    run(&engine, dir.path(), LoadPolicy::Overwrite, TableCase::Lower)
        .0
        .unwrap();

    fs::write(dir.path().join("t.csv"), "c\n1\n2\n3\n").unwrap();
    let (report, events) = run(&engine, dir.path(), LoadPolicy::Overwrite, TableCase::Lower);
    let report = report.unwrap();

    assert_eq!(report.uploaded_count(), 1);
    assert!(!events.iter().any(|e| matches!(e, LoadEvent::Dropped { .. })));
    assert_eq!(engine.row_count("t").unwrap(), 3);
    assert_eq!(engine.table_columns("t").unwrap(), vec!["c"]);
}

// ============================================================================
// Naming
// ============================================================================

#[test]
fn test_case_collision_last_file_wins() {
    let dir = folder(&[("A.csv", "v\nupper\n"), ("a.csv", "v\nlower\nlower\n")]);
    let engine = memory_engine();

    let (report, events) = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower);
    let report = report.unwrap();

    assert_eq!(report.uploaded_tables(), vec!["a", "a"]);
    assert_eq!(engine.list_tables().unwrap(), vec!["a"]);
    // a.csv sorts after A.csv, so its two rows survive.
    assert_eq!(engine.row_count("a").unwrap(), 2);
    assert!(events.contains(&LoadEvent::NameCollision {
        table: "a".into(),
        previous_file: "A.csv".into(),
        file: "a.csv".into(),
    }));
}

#[test]
fn test_preserve_case_keeps_file_stem() {
    let dir = folder(&[("Sales_Q1.csv", "v\n1\n2\n")]);
    let engine = memory_engine();

    let report = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Preserve)
        .0
        .unwrap();

    assert_eq!(report.uploaded_tables(), vec!["Sales_Q1"]);
    assert_eq!(engine.list_tables().unwrap(), vec!["Sales_Q1"]);
    assert_eq!(engine.row_count("Sales_Q1").unwrap(), 2);
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_header_only_file_creates_empty_table() {
    let dir = folder(&[("empty.csv", "id,name,created_at\n")]);
    let engine = memory_engine();

    let report = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();

    assert_eq!(report.uploaded_tables(), vec!["empty"]);
    assert_eq!(engine.row_count("empty").unwrap(), 0);
    assert_eq!(
        engine.table_columns("empty").unwrap(),
        vec!["id", "name", "created_at"]
    );
}

#[test]
fn test_malformed_file_aborts_run() {
    let dir = folder(&[("a_good.csv", "x\n1\n"), ("b_bad.csv", "x,y\n1,2\n3\n"), ("c.csv", "x\n1\n")]);
    let engine = memory_engine();

    let (result, events) = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower);

    let err = result.unwrap_err();
    assert!(matches!(err, Error::CsvParse { ref path, .. } if path.ends_with("b_bad.csv")));

    // Files before the bad one stay loaded; nothing after it runs.
    assert_eq!(engine.list_tables().unwrap(), vec!["a_good"]);
    assert!(!events.iter().any(|e| matches!(
        e,
        LoadEvent::Uploading { table, .. } | LoadEvent::Dropped { table, .. } if table != "a_good"
    )));
}

#[test]
fn test_failed_reload_keeps_previous_table() {
    let dir = folder(&[("t.csv", "a\n1\n")]);
    let engine = memory_engine();
    run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();

    fs::write(dir.path().join("t.csv"), "a,b\n1,2\n3\n").unwrap();
    let (result, events) = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower);

    assert!(matches!(result, Err(Error::CsvParse { .. })));
    assert!(events.is_empty());
    assert_eq!(engine.list_tables().unwrap(), vec!["t"]);
    assert_eq!(engine.row_count("t").unwrap(), 1);
}

#[test]
fn test_reload_with_late_type_change() {
    let dir = folder(&[("t.csv", "a\n1\n")]);
    let engine = memory_engine();
    run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();

    let mut content = String::from("a\n");
    for i in 0..30_000 {
        content.push_str(&format!("{i}\n"));
    }
    content.push_str("xyz\n");
    fs::write(dir.path().join("t.csv"), content).unwrap();

    let report = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();

    assert_eq!(report.total_rows(), 30_001);
    assert_eq!(engine.row_count("t").unwrap(), 30_001);
}

#[test]
fn test_single_column_blank_lines_match_parsed_rows() {
    let dir = folder(&[("s.csv", "a\n1\n\n2\n")]);
    let engine = memory_engine();

    let report = run(&engine, dir.path(), LoadPolicy::DropReload, TableCase::Lower)
        .0
        .unwrap();

    assert_eq!(report.total_rows(), 2);
    assert_eq!(engine.row_count("s").unwrap(), 2);
}

#[test]
fn test_empty_folder_reports_nothing() {
    let dir = folder(&[]);
    let engine = memory_engine();

    let (report, events) = run(&engine, dir.path(), LoadPolicy::SkipExisting, TableCase::Lower);
    let report = report.unwrap();

    assert!(report.outcomes.is_empty());
    assert!(events.is_empty());
}
