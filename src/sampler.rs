//! The polling loop: read counters, print a row, swap, sleep.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{MissingFields, MonitorError, Result};
use crate::procio::{data_row, header_line, parse_into, IoField, SnapshotBuffer, FIELD_COUNT};
use crate::terminal::{GeometrySource, RedrawPolicy};

/// Samples one counter file at a fixed interval and prints a table to `out`.
pub struct Sampler<W, G> {
    source: PathBuf,
    interval: Duration,
    buffer: SnapshotBuffer,
    policy: RedrawPolicy<G>,
    out: W,
    polls: u64,
}

impl<W: Write, G: GeometrySource> Sampler<W, G> {
    pub fn new(source: PathBuf, interval: Duration, policy: RedrawPolicy<G>, out: W) -> Self {
        Self {
            source,
            interval,
            buffer: SnapshotBuffer::new(),
            policy,
            out,
            polls: 0,
        }
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn buffer(&self) -> &SnapshotBuffer {
        &self.buffer
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Opens the source fresh and parses every line into the current slot.
    /// All seven counters must be present, otherwise the poll fails.
    fn read_source(&mut self) -> Result<()> {
        let file = File::open(&self.source).map_err(|source| MonitorError::SourceUnavailable {
            path: self.source.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let snapshot = self.buffer.begin_poll();
        let mut seen = [false; FIELD_COUNT];
        for line in reader.lines() {
            let line = line.map_err(|source| MonitorError::SourceRead {
                path: self.source.clone(),
                source,
            })?;
            let field = parse_into(&line, snapshot)?;
            seen[field.ordinal()] = true;
        }

        let missing: Vec<IoField> = IoField::ALL
            .into_iter()
            .filter(|f| !seen[f.ordinal()])
            .collect();
        if !missing.is_empty() {
            return Err(MonitorError::IncompletePoll {
                path: self.source.clone(),
                missing: MissingFields(missing),
            });
        }
        Ok(())
    }

    /// One full poll: read, print header if due, print the row, swap slots.
    pub fn poll_once(&mut self) -> Result<()> {
        self.read_source()?;

        if self.policy.next_row() {
            writeln!(self.out, "{}", header_line())?;
        }
        writeln!(self.out, "{}", data_row(&self.buffer.row()))?;
        self.out.flush()?;

        self.buffer.swap();
        self.polls += 1;
        debug!("poll {} of {} done", self.polls, self.source.display());
        Ok(())
    }

    /// Polls until `count` polls are done, or forever when `count` is `None`.
    ///
    /// Returns only on error or after a bounded run.
    pub fn run(&mut self, count: Option<u64>) -> Result<()> {
        loop {
            self.poll_once()?;
            if count.is_some_and(|n| self.polls >= n) {
                return Ok(());
            }
            // thread::sleep resumes after EINTR, so SIGWINCH cannot cut it short.
            thread::sleep(self.interval);
        }
    }
}
