//! Directory pipeline tests: fan-in completeness, ordering, errors, and cancellation.

use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tabsort::{CancelToken, Row, SortDirective, SortError, SortOpts, sort_dir};

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|s| s.to_string()).collect()
}

fn opts(field: usize, reverse: bool, workers: usize) -> SortOpts {
    SortOpts {
        directive: SortDirective {
            ignore_header: false,
            reverse,
            field,
        },
        workers: Some(workers),
        follow_links: false,
    }
}

fn run(root: &Path, opts: &SortOpts) -> tabsort::Result<Vec<Row>> {
    let cancel = CancelToken::new();
    let mut sorted = sort_dir(root, opts, &cancel)?;
    let rows: Vec<Row> = sorted.by_ref().collect();
    sorted.finish()?;
    Ok(rows)
}

/// `count` files spread over nested directories; file i has i + 1 rows.
fn write_tree(root: &Path, count: usize) -> usize {
    let mut total = 0;
    for i in 0..count {
        let sub = root.join(format!("d{}", i % 4)).join(format!("e{}", i % 3));
        std::fs::create_dir_all(&sub).unwrap();
        let body: String = (0..=i).map(|r| format!("f{i}r{r},{:04}\n", i * 100 + r)).collect();
        std::fs::write(sub.join(format!("f{i}.csv")), body).unwrap();
        total += i + 1;
    }
    total
}

#[test]
fn test_example_two_files_sorted_by_second_column() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.csv"), "x,1\ny,2\n").unwrap();
    std::fs::write(dir.path().join("b.csv"), "z,3\n").unwrap();
    let rows = run(dir.path(), &opts(1, false, 2)).unwrap();
    assert_eq!(rows, vec![row(&["x", "1"]), row(&["y", "2"]), row(&["z", "3"])]);
}

#[test]
fn test_fan_in_completeness_for_several_widths() {
    let dir = tempfile::tempdir().unwrap();
    let total = write_tree(dir.path(), 25);
    for workers in [1, 2, 3, 8, 32] {
        let rows = run(dir.path(), &opts(1, false, workers)).unwrap();
        assert_eq!(rows.len(), total, "workers = {workers}");
        let mut keys: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total, "duplicated rows with workers = {workers}");
    }
}

#[test]
fn test_output_sorted_regardless_of_width() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), 12);
    for reverse in [false, true] {
        let rows = run(dir.path(), &opts(1, reverse, 4)).unwrap();
        let keys: Vec<&String> = rows.iter().map(|r| &r[1]).collect();
        let mut expected = keys.clone();
        expected.sort();
        if reverse {
            expected.reverse();
        }
        assert_eq!(keys, expected);
    }
}

#[test]
fn test_ascending_and_reversed_descending_agree() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), 10);
    let asc = run(dir.path(), &opts(1, false, 3)).unwrap();
    let mut desc = run(dir.path(), &opts(1, true, 3)).unwrap();
    desc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn test_header_pinned_with_single_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("only.csv"), "name,n\nb,2\na,1\n").unwrap();
    let mut o = opts(0, true, 2);
    o.directive.ignore_header = true;
    let rows = run(dir.path(), &o).unwrap();
    assert_eq!(rows, vec![row(&["name", "n"]), row(&["b", "2"]), row(&["a", "1"])]);
}

#[test]
fn test_invalid_column_yields_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.csv"), "a,b,c\nd,e,f\n").unwrap();
    let cancel = CancelToken::new();
    let mut sorted = sort_dir(dir.path(), &opts(5, false, 2), &cancel).unwrap();
    assert!(sorted.next().is_none());
    match sorted.finish() {
        Err(SortError::InvalidColumn { columns, .. }) => assert_eq!(columns, 3),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_malformed_file_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), 6);
    std::fs::write(dir.path().join("broken.csv"), "a,b\nc\n").unwrap();
    let err = run(dir.path(), &opts(0, false, 3)).unwrap_err();
    assert!(matches!(err, SortError::Decode { .. }), "{err}");
}

#[test]
fn test_missing_root_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelToken::new();
    let err = sort_dir(&dir.path().join("absent"), &opts(0, false, 1), &cancel)
        .err()
        .unwrap();
    assert!(matches!(err, SortError::Io { .. }));
}

#[test]
fn test_root_must_be_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.csv");
    std::fs::write(&file, "a\n").unwrap();
    let cancel = CancelToken::new();
    assert!(sort_dir(&file, &opts(0, false, 1), &cancel).is_err());
}

#[test]
fn test_zero_workers_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelToken::new();
    let err = sort_dir(dir.path(), &opts(0, false, 0), &cancel).err().unwrap();
    assert!(matches!(err, SortError::Usage(_)));
}

#[test]
fn test_empty_directory_gives_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nothing_here")).unwrap();
    let rows = run(dir.path(), &opts(3, false, 2)).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_files_with_different_arity_are_merged() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("wide.csv"), "b,2,extra\n").unwrap();
    std::fs::write(dir.path().join("narrow.csv"), "a,1\n").unwrap();
    let rows = run(dir.path(), &opts(0, false, 2)).unwrap();
    assert_eq!(rows, vec![row(&["a", "1"]), row(&["b", "2", "extra"])]);
}

/// Run `f` on a helper thread and fail if it does not finish in time.
fn within<T: Send + 'static>(secs: u64, f: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(Duration::from_secs(secs))
        .expect("pipeline did not shut down in time")
}

#[test]
fn test_cancel_before_start_terminates() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), 40);
    let root = dir.path().to_path_buf();
    let report = within(10, move || {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut sorted = sort_dir(&root, &opts(1, false, 4), &cancel).unwrap();
        let rows: Vec<Row> = sorted.by_ref().collect();
        let report = sorted.finish().unwrap();
        assert_eq!(rows.len(), report.rows);
        report
    });
    assert!(report.cancelled);
}

#[test]
fn test_cancel_mid_drain_yields_whole_rows() {
    let dir = tempfile::tempdir().unwrap();
    let total = write_tree(dir.path(), 30);
    let root = dir.path().to_path_buf();
    let (rows, report) = within(10, move || {
        let cancel = CancelToken::new();
        let mut sorted = sort_dir(&root, &opts(1, false, 4), &cancel).unwrap();
        let mut rows = Vec::new();
        for (i, r) in sorted.by_ref().enumerate() {
            rows.push(r);
            if i == 5 {
                cancel.cancel();
            }
        }
        (rows, sorted.finish().unwrap())
    });
    assert!(report.cancelled);
    assert!(rows.len() <= total);
    for r in &rows {
        assert_eq!(r.len(), 2);
        assert!(r[0].starts_with('f'));
    }
}

#[test]
fn test_cancel_from_another_thread_during_run() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), 60);
    let root = dir.path().to_path_buf();
    within(10, move || {
        let cancel = CancelToken::new();
        let trigger = {
            let cancel = cancel.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(1));
                cancel.cancel();
            })
        };
        let mut sorted = sort_dir(&root, &opts(0, false, 8), &cancel).unwrap();
        let rows: Vec<Row> = sorted.by_ref().collect();
        trigger.join().unwrap();
        let report = sorted.finish().unwrap();
        assert_eq!(rows.len(), report.rows);
    });
}

#[test]
fn test_consumer_stops_early_then_finish_joins() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), 20);
    let root = dir.path().to_path_buf();
    let report = within(10, move || {
        let cancel = CancelToken::new();
        let mut sorted = sort_dir(&root, &opts(1, false, 3), &cancel).unwrap();
        let first: Vec<Row> = sorted.by_ref().take(3).collect();
        assert_eq!(first.len(), 3);
        sorted.finish().unwrap()
    });
    assert_eq!(report.rows, 3);
    assert!(!report.cancelled);
}
