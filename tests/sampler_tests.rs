//! Integration tests for the sampling loop.
//!
//! These tests drive `Sampler` against counter files in a temp directory and
//! capture the table in memory.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use iopid::procio::{data_row, header_line};
use iopid::{io_path, GeometrySource, MonitorError, RedrawPolicy, Sampler};
use tempfile::tempdir;

fn write_io(path: &Path, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).expect("Failed to write io file");
}

fn output_lines<G: GeometrySource>(sampler: Sampler<Vec<u8>, G>) -> Vec<String> {
    String::from_utf8(sampler.into_output())
        .expect("table is utf-8")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Lays out a proc-like tree so the path goes through `io_path`.
fn proc_tree(root: &Path, pid: u32) -> std::path::PathBuf {
    let dir = root.join(pid.to_string());
    std::fs::create_dir_all(&dir).expect("Failed to create pid dir");
    io_path(root, pid)
}

#[test]
fn test_two_polls_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let io = proc_tree(dir.path(), 4242);

    write_io(
        &io,
        &[
            "rchar: 100",
            "wchar: 50",
            "syscr: 1",
            "syscw: 1",
            "read_bytes: 4096",
            "write_bytes: 0",
            "cancelled_write_bytes: 0",
        ],
    );

    let mut sampler = Sampler::new(
        io.clone(),
        Duration::ZERO,
        RedrawPolicy::non_interactive(|| None::<u16>),
        Vec::new(),
    );
    sampler.poll_once().unwrap();

    write_io(
        &io,
        &[
            "rchar: 2148",
            "wchar: 50",
            "syscr: 1",
            "syscw: 1",
            "read_bytes: 4096",
            "write_bytes: 0",
            "cancelled_write_bytes: 0",
        ],
    );
    sampler.poll_once().unwrap();

    let lines = output_lines(sampler);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], header_line());

    // First row: raw counters, 4096 read bytes scaled to 4.0k.
    let first: Vec<&str> = lines[1].split_whitespace().collect();
    assert_eq!(first, vec!["100", "50", "1", "1", "4.0k", "0", "0"]);

    // Second row: rchar moved by 2048, read_bytes not at all.
    let second: Vec<&str> = lines[2].split_whitespace().collect();
    assert_eq!(second, vec!["2.0k", "0", "0", "0", "0", "0", "0"]);
}

#[test]
fn test_line_order_does_not_matter() {
    let dir = tempdir().expect("Failed to create temp dir");
    let io = dir.path().join("io");
    write_io(
        &io,
        &[
            "cancelled_write_bytes: 7",
            "syscw: 4",
            "write_bytes: 6",
            "rchar: 1",
            "syscr: 3",
            "read_bytes: 5",
            "wchar: 2",
        ],
    );

    let mut sampler = Sampler::new(
        io,
        Duration::ZERO,
        RedrawPolicy::non_interactive(|| None::<u16>),
        Vec::new(),
    );
    sampler.poll_once().unwrap();

    let lines = output_lines(sampler);
    assert_eq!(lines[1], data_row(&[1, 2, 3, 4, 5, 6, 7]));
}

#[test]
fn test_counter_reset_wraps_instead_of_clamping() {
    let dir = tempdir().expect("Failed to create temp dir");
    let io = dir.path().join("io");
    let poll = |rchar: u64| {
        let r = format!("rchar: {}", rchar);
        write_io(
            &io,
            &[
                r.as_str(),
                "wchar: 0",
                "syscr: 0",
                "syscw: 0",
                "read_bytes: 0",
                "write_bytes: 0",
                "cancelled_write_bytes: 0",
            ],
        );
    };

    let mut sampler = Sampler::new(
        io.clone(),
        Duration::ZERO,
        RedrawPolicy::non_interactive(|| None::<u16>),
        Vec::new(),
    );
    poll(5000);
    sampler.poll_once().unwrap();
    poll(1000);
    sampler.poll_once().unwrap();

    let lines = output_lines(sampler);
    let rchar = lines[2].split_whitespace().next().unwrap();
    assert!(rchar.ends_with('G'), "expected a wrapped huge delta, got {}", rchar);
    assert_ne!(rchar, "0");
}

#[test]
fn test_header_repeats_per_screen_on_terminal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let io = dir.path().join("io");
    write_io(
        &io,
        &[
            "rchar: 0",
            "wchar: 0",
            "syscr: 0",
            "syscw: 0",
            "read_bytes: 0",
            "write_bytes: 0",
            "cancelled_write_bytes: 0",
        ],
    );

    let flag = Arc::new(AtomicBool::new(false));
    let mut sampler = Sampler::new(
        io,
        Duration::ZERO,
        RedrawPolicy::interactive(|| Some(5u16), flag),
        Vec::new(),
    );
    sampler.run(Some(9)).unwrap();

    let lines = output_lines(sampler);
    let header = header_line();
    let header_at: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| **l == header)
        .map(|(i, _)| i)
        .collect();

    // Every screen of 5 lines starts with a header.
    assert_eq!(header_at, vec![0, 5, 10]);
    assert_eq!(lines.len(), 12);
}

#[test]
fn test_resize_reprints_header() {
    let dir = tempdir().expect("Failed to create temp dir");
    let io = dir.path().join("io");
    write_io(
        &io,
        &[
            "rchar: 0",
            "wchar: 0",
            "syscr: 0",
            "syscw: 0",
            "read_bytes: 0",
            "write_bytes: 0",
            "cancelled_write_bytes: 0",
        ],
    );

    let rows = Rc::new(Cell::new(Some(100u16)));
    let geometry = {
        let rows = Rc::clone(&rows);
        move || rows.get()
    };
    let flag = Arc::new(AtomicBool::new(false));
    let mut sampler = Sampler::new(
        io,
        Duration::ZERO,
        RedrawPolicy::interactive(geometry, Arc::clone(&flag)),
        Vec::new(),
    );

    sampler.run(Some(3)).unwrap();
    rows.set(Some(40));
    flag.store(true, Ordering::SeqCst);
    sampler.poll_once().unwrap();

    let lines = output_lines(sampler);
    let header = header_line();
    assert_eq!(lines.iter().filter(|l| **l == header).count(), 2);
    assert_eq!(lines[4], header);
}

#[test]
fn test_vanished_process_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let io = dir.path().join("io");
    write_io(
        &io,
        &[
            "rchar: 0",
            "wchar: 0",
            "syscr: 0",
            "syscw: 0",
            "read_bytes: 0",
            "write_bytes: 0",
            "cancelled_write_bytes: 0",
        ],
    );

    let mut sampler = Sampler::new(
        io.clone(),
        Duration::ZERO,
        RedrawPolicy::non_interactive(|| None::<u16>),
        Vec::new(),
    );
    sampler.poll_once().unwrap();
    std::fs::remove_file(&io).unwrap();

    let err = sampler.run(None).unwrap_err();
    assert!(matches!(err, MonitorError::SourceUnavailable { .. }));
    assert!(err.to_string().contains(&io.display().to_string()));
}
