//! Reconciliation index behavior under repeated and concurrent matching.
//!
//! These tests build an index directly from log entries and exercise the
//! claim accounting the pipeline relies on.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use migmap::reconcile::{IndexOptions, LogEntry, RawLogRow, ReconciliationIndex};
use migmap::{ItemKind, LiveItem, PathResolver};

fn entry(row: usize, principal: &str, path: &str, kind: &str) -> LogEntry {
    RawLogRow {
        source_path: principal.into(),
        full_path: path.into(),
        destination_location: format!("https://tenant.sharepoint.com/dest{path}"),
        destination_type: kind.into(),
        ..RawLogRow::default()
    }
    .validate(row)
    .unwrap()
}

/// Index over `/f{i}.txt` rows 1..=count for one principal.
fn flat_index(count: usize) -> ReconciliationIndex {
    let entries = (1..=count).map(|i| entry(i, "a@x.com", &format!("/f{i}.txt"), "file"));
    ReconciliationIndex::build(entries, IndexOptions::default())
}

/// Tests that the unmatched report lists exactly the rows nobody claimed.
///
/// Every third row is claimed; the report must contain the other rows, in
/// row order, and nothing else.
#[test]
fn test_unmatched_is_exactly_the_never_claimed_rows() {
    let index = flat_index(30);
    let mut claimed = BTreeSet::new();
    for i in (1..=30).step_by(3) {
        let path = format!("/f{i}.txt");
        let name = format!("f{i}.txt");
        assert!(index.match_item("a@x.com", "file", &path, &name).is_some());
        claimed.insert(i);
    }

    let report = index.unmatched_entries();
    let rows: Vec<usize> = report.rows.iter().map(|r| r.row).collect();
    let expected: Vec<usize> = (1..=30).filter(|i| !claimed.contains(i)).collect();
    assert_eq!(rows, expected);
    assert_eq!(index.matched_count(), claimed.len());
    assert_eq!(report.len() + index.matched_count(), index.len());
}

/// Tests that matching the same live path twice never claims twice.
#[test]
fn test_repeated_match_is_idempotent() {
    let index = flat_index(3);
    assert!(index.match_item("a@x.com", "file", "/f1.txt", "f1.txt").is_some());
    for _ in 0..5 {
        assert!(index.match_item("a@x.com", "file", "/f1.txt", "f1.txt").is_none());
    }
    assert_eq!(index.usage_histogram().get(&1), Some(&1));
    assert_eq!(index.usage_histogram().get(&0), Some(&2));
}

/// Tests that the key includes principal and destination type.
#[test]
fn test_key_isolates_principal_and_type() {
    let index = ReconciliationIndex::build(
        vec![
            entry(1, "a@x.com", "/Docs", "folder"),
            entry(2, "b@x.com", "/Docs", "folder"),
        ],
        IndexOptions::default(),
    );
    assert!(index.match_item("a@x.com", "file", "/Docs", "Docs").is_none());
    assert!(index.match_item("c@x.com", "folder", "/Docs", "Docs").is_none());
    assert!(index.match_item("b@x.com", "folder", "/Docs", "Docs").is_some());
    assert_eq!(index.principals(), ["a@x.com", "b@x.com"]);
}

/// Tests that a collision leaves one entry, claimable once.
#[test]
fn test_collision_accounting() {
    let mut second = RawLogRow {
        source_path: "a@x.com".into(),
        full_path: "/f.txt".into(),
        destination_location: "https://tenant.sharepoint.com/other/f.txt".into(),
        destination_type: "file".into(),
        ..RawLogRow::default()
    };
    let first = entry(1, "a@x.com", "/f.txt", "file");
    second.full_path = " /f.txt ".into();
    let index = ReconciliationIndex::build(
        vec![first, second.validate(2).unwrap()],
        IndexOptions::default(),
    );

    assert_eq!(index.total_rows(), 2);
    assert_eq!(index.len(), 1);
    assert_eq!(index.collisions().len(), 1);
    assert_eq!(index.collisions()[0].kept_row, 2);
    assert_eq!(index.collisions()[0].discarded_row, 1);

    let claim = index.match_item("a@x.com", "file", "/f.txt", "f.txt").unwrap();
    assert_eq!(claim.entry.destination_path(), "/other/f.txt");
    assert!(index.match_item("a@x.com", "file", "/f.txt", "f.txt").is_none());
}

/// Tests that concurrent matching never over-claims.
///
/// **What this tests:**
/// - 32 threads race to match the same 50 duplicated live paths
/// - Each of the 200 log rows (`/r.pdf` and copies 1-3 for 50 stems) must be
///   claimed exactly once
/// - Exactly 200 of the 32 * 50 * 4 attempts succeed
#[test]
fn test_concurrent_matching_claims_each_row_once() {
    let mut entries = Vec::new();
    let mut row = 0;
    for stem in 0..50 {
        for copy in 0..4 {
            row += 1;
            let path = if copy == 0 {
                format!("/r{stem}.pdf")
            } else {
                format!("/r{stem} ({copy}).pdf")
            };
            entries.push(entry(row, "a@x.com", &path, "file"));
        }
    }
    let index = ReconciliationIndex::build(entries, IndexOptions::default());
    let successes = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..32 {
            scope.spawn(|| {
                for stem in 0..50 {
                    let path = format!("/r{stem}.pdf");
                    let name = format!("r{stem}.pdf");
                    for _ in 0..4 {
                        if index.match_item("a@x.com", "file", &path, &name).is_some() {
                            successes.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
    });

    assert_eq!(successes.load(Ordering::Relaxed), 200);
    assert_eq!(index.usage_histogram().len(), 1);
    assert_eq!(index.usage_histogram().get(&1), Some(&200));
    assert!(index.unmatched_entries().is_empty());
}

/// Tests that resolved paths of a multi-parent hierarchy line up with log
/// rows written for each of them.
#[test]
fn test_resolved_paths_match_log_rows() {
    // Two roots, a shared folder under both, and a file in the shared folder:
    // the file has 2 paths.
    let items = vec![
        LiveItem::new("r1", "Team", ItemKind::Folder, Vec::<String>::new()),
        LiveItem::new("r2", "Mine", ItemKind::Folder, Vec::<String>::new()),
        LiveItem::new("s", "Shared", ItemKind::Folder, ["r1", "r2"]),
        LiveItem::new("f", "plan.docx", ItemKind::File, ["s"]),
    ];
    let paths = PathResolver::new().resolve(&items).unwrap();
    assert_eq!(paths.get("f").len(), 2);

    let index = ReconciliationIndex::build(
        vec![
            entry(1, "a@x.com", "/Team/Shared/plan.docx", "file"),
            entry(2, "a@x.com", "/Mine/Shared/plan.docx", "file"),
        ],
        IndexOptions::default(),
    );
    let matched = paths
        .get("f")
        .iter()
        .filter(|p| index.match_item("a@x.com", "file", p, "plan.docx").is_some())
        .count();
    assert_eq!(matched, 2);
    assert!(index.unmatched_entries().is_empty());
}
