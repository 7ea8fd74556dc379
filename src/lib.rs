//! iopid sampling engine.
//!
//! Reads `/proc/<pid>/io` at a fixed interval and renders per-interval
//! deltas as a table, repeating the header when the terminal scrolls or is
//! resized.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use iopid::{io_path, RedrawPolicy, Sampler};
//!
//! let path = io_path("/proc".as_ref(), 1);
//! let policy = RedrawPolicy::for_stdout(true);
//! let mut sampler = Sampler::new(path, Duration::from_secs(1), policy, std::io::stdout());
//! sampler.run(Some(5)).unwrap();
//! ```

pub mod error;
pub mod procio;
pub mod sampler;
pub mod terminal;

// Re-export main types for convenience
pub use error::{MissingFields, MonitorError, Result};
pub use procio::{io_path, IoField, Snapshot, SnapshotBuffer};
pub use sampler::Sampler;
pub use terminal::{GeometrySource, RedrawPolicy, TerminalState, TtyGeometry};
