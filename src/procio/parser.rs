//! Line parser for `/proc/<pid>/io`.
//!
//! Each line has the form `<name>: <u64>`. Several names share leading
//! characters, so a line is classified by looking at no more than two bytes:
//!
//! | first | check          | field                   |
//! |-------|----------------|-------------------------|
//! | `c`   | -              | `cancelled_write_bytes` |
//! | `r`   | `[1] == 'c'`   | `rchar`, else `read_bytes`  |
//! | `w`   | `[1] == 'c'`   | `wchar`, else `write_bytes` |
//! | `s`   | `[4] == 'r'`   | `syscr`, else `syscw`   |
//!
//! Anything else is a protocol violation and aborts the run.

use tracing::trace;

use super::fields::IoField;
use super::snapshot::Snapshot;
use crate::error::{MonitorError, Result};

/// Identifies which counter a line carries.
pub fn classify(line: &str) -> Result<IoField> {
    let bytes = line.as_bytes();
    let at = |i: usize| bytes.get(i).copied();

    let field = match at(0) {
        Some(b'c') => IoField::CancelledWriteBytes,
        Some(b'r') if at(1) == Some(b'c') => IoField::Rchar,
        Some(b'r') => IoField::ReadBytes,
        Some(b'w') if at(1) == Some(b'c') => IoField::Wchar,
        Some(b'w') => IoField::WriteBytes,
        Some(b's') if at(4) == Some(b'r') => IoField::Syscr,
        Some(b's') => IoField::Syscw,
        _ => {
            return Err(MonitorError::ProtocolViolation {
                line: line.to_string(),
            })
        }
    };

    Ok(field)
}

/// Decodes one line into its field and value.
///
/// A trailing newline (`\n` or `\r\n`) is ignored.
pub fn parse_line(line: &str) -> Result<(IoField, u64)> {
    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
    let field = classify(line)?;

    let raw = line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
    let value = raw.parse::<u64>().map_err(|_| MonitorError::MalformedValue {
        field,
        value: raw.to_string(),
    })?;

    trace!("{} = {}", field, value);
    Ok((field, value))
}

/// Parses `line` and stores its value in `snapshot`. Touches exactly one field.
pub fn parse_into(line: &str, snapshot: &mut Snapshot) -> Result<IoField> {
    let (field, value) = parse_line(line)?;
    snapshot.set(field, value);
    Ok(field)
}
