//! The seven counters exposed by `/proc/<pid>/io`.
//!
//! The order of [`IoField::ALL`] is the column order of both the header and
//! every data row, and each field's ordinal indexes into a [`Snapshot`].
//!
//! [`Snapshot`]: super::snapshot::Snapshot

/// Number of counters in one poll.
pub const FIELD_COUNT: usize = 7;

/// One counter of `/proc/<pid>/io`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoField {
    /// Bytes passed through read(2) and friends, page cache included.
    Rchar,
    /// Bytes passed through write(2) and friends, page cache included.
    Wchar,
    /// Read syscalls issued.
    Syscr,
    /// Write syscalls issued.
    Syscw,
    /// Bytes actually fetched from storage.
    ReadBytes,
    /// Bytes actually sent to storage.
    WriteBytes,
    /// Bytes counted in `write_bytes` that were later truncated away.
    CancelledWriteBytes,
}

impl IoField {
    /// All fields in ordinal order.
    pub const ALL: [IoField; FIELD_COUNT] = [
        IoField::Rchar,
        IoField::Wchar,
        IoField::Syscr,
        IoField::Syscw,
        IoField::ReadBytes,
        IoField::WriteBytes,
        IoField::CancelledWriteBytes,
    ];

    /// Dense, stable index in `0..FIELD_COUNT`.
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Column label printed in the header.
    pub const fn label(self) -> &'static str {
        match self {
            IoField::Rchar => "rchar",
            IoField::Wchar => "wchar",
            IoField::Syscr => "syscr",
            IoField::Syscw => "syscw",
            IoField::ReadBytes => "rbytes",
            IoField::WriteBytes => "wbytes",
            IoField::CancelledWriteBytes => "cancelled",
        }
    }

    /// Key as the kernel spells it, without the trailing colon.
    pub const fn proc_name(self) -> &'static str {
        match self {
            IoField::Rchar => "rchar",
            IoField::Wchar => "wchar",
            IoField::Syscr => "syscr",
            IoField::Syscw => "syscw",
            IoField::ReadBytes => "read_bytes",
            IoField::WriteBytes => "write_bytes",
            IoField::CancelledWriteBytes => "cancelled_write_bytes",
        }
    }
}

impl std::fmt::Display for IoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.proc_name())
    }
}
