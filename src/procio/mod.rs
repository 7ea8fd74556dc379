//! Reading and rendering `/proc/<pid>/io`.
//!
//! This module provides:
//! - `fields`: the seven counters and their column order
//! - `parser`: line classification and value decoding
//! - `snapshot`: per-poll snapshots and the two-slot buffer
//! - `format`: magnitude scaling and table layout

pub mod fields;
pub mod format;
pub mod parser;
pub mod snapshot;

use std::path::{Path, PathBuf};

pub use fields::{IoField, FIELD_COUNT};
pub use format::{data_row, format_magnitude, header_line, Scale};
pub use parser::{classify, parse_into, parse_line};
pub use snapshot::{Snapshot, SnapshotBuffer};

/// Path of the io counter file for `pid` below `proc_root`.
pub fn io_path(proc_root: &Path, pid: u32) -> PathBuf {
    proc_root.join(pid.to_string()).join("io")
}
