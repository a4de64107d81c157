//! Range checks.

use crate::pipeline::{CheckTask, TaskConfig, TaskValue};
use crate::table::{Cell, Table};

use super::{single_column, status, violations};

/// Inclusive bounds of a plausible age.
pub const AGE_RANGE: std::ops::RangeInclusive<i64> = 0..=120;

/// Integer reading of a cell, if it has one. Floats truncate toward zero.
fn as_integer(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Null => None,
        Cell::Bool(b) => Some(i64::from(*b)),
        Cell::Int(i) => Some(*i),
        Cell::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Cell::Float(_) => None,
        Cell::Str(s) => s.trim().parse().ok(),
    }
}

fn is_valid_age(cell: &Cell) -> bool {
    as_integer(cell).is_some_and(|age| AGE_RANGE.contains(&age))
}

/// Report ages that are missing, not integers, or outside 0..=120.
///
/// Options: `column` (default `Age`).
pub struct AgeValidity;

impl CheckTask for AgeValidity {
    fn name(&self) -> &str {
        "check_age_validity"
    }

    fn description(&self) -> &str {
        "Find ages that are missing, non-integer or outside 0-120."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let column = config.column_or("Age")?;
        Ok(single_column(table, &column, |col| {
            let invalid = violations(col, |cell| !is_valid_age(cell));
            TaskValue::map()
                .with("invalid_age_count", invalid.len())
                .with("status", status(invalid.len(), "invalid ages"))
                .with("invalid_entries", invalid)
        }))
    }
}
