//! Error types for the sampling engine.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::procio::IoField;

/// Every failure here ends the run; there is no degraded output mode.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("unable to open {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading {}: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unrecognized counter line: {line:?}")]
    ProtocolViolation { line: String },

    #[error("invalid value for {field}: {value:?}")]
    MalformedValue { field: IoField, value: String },

    #[error("incomplete sample from {}: missing {missing}", .path.display())]
    IncompletePoll {
        path: PathBuf,
        missing: MissingFields,
    },

    #[error("failed writing output: {0}")]
    Output(#[from] io::Error),
}

/// Counters absent from a poll, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<IoField>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_names_path_and_os_error() {
        let err = MonitorError::SourceUnavailable {
            path: PathBuf::from("/proc/4242/io"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("unable to open /proc/4242/io: "), "{}", msg);
        assert!(msg.len() > "unable to open /proc/4242/io: ".len());
    }

    #[test]
    fn test_incomplete_poll_lists_missing_fields() {
        let err = MonitorError::IncompletePoll {
            path: PathBuf::from("/proc/1/io"),
            missing: MissingFields(vec![IoField::Syscr, IoField::CancelledWriteBytes]),
        };
        assert_eq!(
            err.to_string(),
            "incomplete sample from /proc/1/io: missing syscr, cancelled_write_bytes"
        );
    }

    #[test]
    fn test_protocol_violation_quotes_line() {
        let err = MonitorError::ProtocolViolation {
            line: "bogus: 1".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized counter line: \"bogus: 1\"");
    }
}
