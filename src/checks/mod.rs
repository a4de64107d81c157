//! Built-in data-quality checks.
//!
//! Every check follows the same shape: resolve the target column(s) from the
//! invocation options, report a missing column as a per-column
//! `{"error": "Column '<c>' not found"}` entry, scan the rows and summarize
//! the violating `{index, value}` entries with a count and a status line.
//!
//! The checks are also the compiled catalog new registry entries are built
//! from: a task can be registered under a new name by pointing at one of the
//! kinds below, never by submitting code.

mod completeness;
mod consistency;
mod duplicates;
mod format;
mod range;

pub use completeness::{MissingValues, NameConsistency};
pub use consistency::GenderConsistency;
pub use duplicates::Duplicates;
pub use format::{DateFormats, EmailFormat};
pub use range::AgeValidity;

use std::sync::Arc;

use crate::pipeline::{CheckTask, TaskInfo, TaskValue};
use crate::table::{Cell, Column, Table};

/// All built-in checks, each under its own name.
pub fn default_tasks() -> Vec<Arc<dyn CheckTask>> {
    vec![
        Arc::new(MissingValues),
        Arc::new(Duplicates),
        Arc::new(DateFormats),
        Arc::new(EmailFormat),
        Arc::new(GenderConsistency),
        Arc::new(NameConsistency),
        Arc::new(AgeValidity),
    ]
}

/// Look up a compiled check by kind (its built-in name).
pub fn builtin(kind: &str) -> Option<Arc<dyn CheckTask>> {
    default_tasks().into_iter().find(|t| t.name() == kind)
}

/// Describe every compiled check kind.
pub fn catalog() -> Vec<TaskInfo> {
    default_tasks()
        .iter()
        .map(|t| TaskInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
        })
        .collect()
}

/// Per-column entry for a target column absent from the table.
pub(crate) fn column_not_found(column: &str) -> TaskValue {
    TaskValue::map().with("error", format!("Column '{}' not found", column))
}

/// A violating row.
pub(crate) fn entry(index: usize, value: impl Into<TaskValue>) -> TaskValue {
    TaskValue::map().with("index", index).with("value", value)
}

/// Collect `{index, value}` entries for every cell matching `violates`.
pub(crate) fn violations<F>(column: &Column, violates: F) -> Vec<TaskValue>
where
    F: Fn(&Cell) -> bool,
{
    column
        .iter()
        .filter(|(_, cell)| violates(cell))
        .map(|(index, cell)| entry(index, cell))
        .collect()
}

/// `"OK"` when nothing was found, otherwise `"<count> <description> found"`.
pub(crate) fn status(count: usize, description: &str) -> String {
    if count == 0 {
        "OK".to_string()
    } else {
        format!("{} {} found", count, description)
    }
}

/// Run a single-column scan, keyed by the column name.
pub(crate) fn single_column<F>(table: &Table, column: &str, scan: F) -> TaskValue
where
    F: FnOnce(&Column) -> TaskValue,
{
    let outcome = match table.column(column) {
        Some(col) => scan(col),
        None => column_not_found(column),
    };
    TaskValue::map().with(column, outcome)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize;
    use serde_json::json;

    #[test]
    fn test_catalog_matches_defaults() {
        let names: Vec<_> = catalog().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"check_age_validity".to_string()));
        assert!(catalog().iter().all(|t| !t.description.is_empty()));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin("check_email_format").unwrap().name(), "check_email_format");
        assert!(builtin("run_script").is_none());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status(0, "invalid ages"), "OK");
        assert_eq!(status(3, "invalid ages"), "3 invalid ages found");
    }

    #[test]
    fn test_single_column_missing() {
        let out = single_column(&Table::default(), "Email", |_| TaskValue::Null);
        assert_eq!(
            normalize(out),
            json!({"Email": {"error": "Column 'Email' not found"}})
        );
    }
}
