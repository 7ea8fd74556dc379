//! Human-readable rendering of counter deltas.
//!
//! The scale divisors are 1024 for `k`, 1014×1024 for `M` and 1014×1024×1024
//! for `G`. The 1014 is not a typo.

use super::fields::{IoField, FIELD_COUNT};

const SZ_KB: u64 = 1024;
const SZ_MB: u64 = 1014 * 1024;
const SZ_GB: u64 = 1014 * 1024 * 1024;

/// Width of one table column, not counting the separating space.
pub const COLUMN_WIDTH: usize = 8;

/// Minimum width of a scaled value such as `2.0k`.
const SCALED_WIDTH: usize = 4;

/// Magnitude class of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Plain,
    Kilo,
    Mega,
    Giga,
}

impl Scale {
    /// Picks the class for `n`. G is inclusive at its threshold, M and k are
    /// exclusive: 1024 stays plain and 1014×1024 stays in k.
    pub fn of(n: u64) -> Self {
        if n >= SZ_GB {
            Scale::Giga
        } else if n > SZ_MB {
            Scale::Mega
        } else if n > SZ_KB {
            Scale::Kilo
        } else {
            Scale::Plain
        }
    }

    fn divisor_and_suffix(self) -> Option<(u64, char)> {
        match self {
            Scale::Plain => None,
            Scale::Kilo => Some((SZ_KB, 'k')),
            Scale::Mega => Some((SZ_MB, 'M')),
            Scale::Giga => Some((SZ_GB, 'G')),
        }
    }
}

/// Renders one value, left-justified.
///
/// Scaled values get one fractional digit and a suffix (`2.0k`) padded to 4
/// columns; plain values are padded to 8.
pub fn format_magnitude(n: u64) -> String {
    match Scale::of(n).divisor_and_suffix() {
        Some((divisor, suffix)) => {
            let scaled = format!("{:.1}{}", n as f64 / divisor as f64, suffix);
            format!("{:<width$}", scaled, width = SCALED_WIDTH)
        }
        None => format!("{:<width$}", n, width = COLUMN_WIDTH),
    }
}

fn join_columns<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .map(|c| format!("{:<width$}", c.as_ref(), width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Column header, one label per field in ordinal order.
pub fn header_line() -> String {
    join_columns(IoField::ALL.iter().map(|f| f.label()))
}

/// One data row laid out under [`header_line`].
pub fn data_row(values: &[u64; FIELD_COUNT]) -> String {
    join_columns(values.iter().map(|&v| format_magnitude(v)))
}
