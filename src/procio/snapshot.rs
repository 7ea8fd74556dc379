//! Counter snapshots and the two-slot buffer that holds consecutive polls.

use super::fields::{IoField, FIELD_COUNT};

/// One full poll of `/proc/<pid>/io`, indexed by [`IoField::ordinal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: [u64; FIELD_COUNT],
}

impl Snapshot {
    pub fn get(&self, field: IoField) -> u64 {
        self.values[field.ordinal()]
    }

    pub fn set(&mut self, field: IoField, value: u64) {
        self.values[field.ordinal()] = value;
    }

    /// Zeroes every counter.
    pub fn clear(&mut self) {
        self.values = [0; FIELD_COUNT];
    }

    /// Per-field `self - earlier`.
    ///
    /// Subtraction wraps: a counter that went backwards (the pid was reused
    /// by a new process) shows up as a huge value rather than zero.
    pub fn delta_since(&self, earlier: &Snapshot) -> [u64; FIELD_COUNT] {
        let mut out = [0; FIELD_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.values[i].wrapping_sub(earlier.values[i]);
        }
        out
    }

    pub fn values(&self) -> [u64; FIELD_COUNT] {
        self.values
    }
}

/// Two snapshot slots whose roles alternate after every poll.
///
/// The buffer starts with no previous sample; the first row is printed from
/// raw counters and only later rows are deltas.
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    slots: [Snapshot; 2],
    current: usize,
    has_previous: bool,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes the current slot and hands it out for filling.
    pub fn begin_poll(&mut self) -> &mut Snapshot {
        let slot = &mut self.slots[self.current];
        slot.clear();
        slot
    }

    /// The just-filled snapshot and, after the first poll, the one before it.
    pub fn current_and_previous(&self) -> (&Snapshot, Option<&Snapshot>) {
        let current = &self.slots[self.current];
        let previous = self.has_previous.then(|| &self.slots[1 - self.current]);
        (current, previous)
    }

    /// Values to print for the current poll: deltas when a previous poll
    /// exists, raw counters otherwise.
    pub fn row(&self) -> [u64; FIELD_COUNT] {
        match self.current_and_previous() {
            (current, Some(previous)) => current.delta_since(previous),
            (current, None) => current.values(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Makes the just-filled slot the previous one.
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
        self.has_previous = true;
    }
}
