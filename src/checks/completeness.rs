//! Completeness checks: absent cells and blank names.

use crate::pipeline::{CheckTask, TaskConfig, TaskValue};
use crate::table::{Cell, Table};

use super::{column_not_found, entry, single_column, status, violations};

/// Report null cells per column.
///
/// Options: `columns` (default: every column of the table).
pub struct MissingValues;

impl CheckTask for MissingValues {
    fn name(&self) -> &str {
        "check_missing_values"
    }

    fn description(&self) -> &str {
        "Count missing (null) cells per column."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let columns = config.columns_or(table.column_names())?;
        let mut result = TaskValue::map();

        for name in columns {
            let Some(column) = table.column(&name) else {
                result.insert(name.clone(), column_not_found(&name));
                continue;
            };

            let missing: Vec<TaskValue> = column
                .iter()
                .filter(|(_, cell)| cell.is_null())
                .map(|(index, _)| entry(index, "NaN"))
                .collect();
            let count = missing.len();
            let status = if count == 0 {
                "OK".to_string()
            } else {
                format!("{} missing values", count)
            };

            result.insert(
                name,
                TaskValue::map()
                    .with("missing_count", count)
                    .with("status", status)
                    .with("missing_values", missing),
            );
        }
        Ok(result)
    }
}

/// Report null or empty names.
///
/// Options: `column` (default `Name`).
pub struct NameConsistency;

impl CheckTask for NameConsistency {
    fn name(&self) -> &str {
        "check_name_consistency"
    }

    fn description(&self) -> &str {
        "Find blank (null or empty) names."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let column = config.column_or("Name")?;
        Ok(single_column(table, &column, |col| {
            let blank = violations(col, |cell| {
                cell.is_null() || matches!(cell, Cell::Str(s) if s.is_empty())
            });
            TaskValue::map()
                .with("blank_name_count", blank.len())
                .with("status", status(blank.len(), "blank names"))
                .with("blank_entries", blank)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{run, s, table};
    use serde_json::json;

    #[test]
    fn test_missing_values_all_columns() {
        let t = table(vec![
            ("A", vec![Cell::Int(1), Cell::Null, Cell::Float(f64::NAN)]),
            ("B", vec![s("x"), s("y"), s("z")]),
        ]);
        let out = run(&MissingValues, &t, json!({}));
        assert_eq!(
            out,
            json!({
                "A": {
                    "missing_count": 2,
                    "status": "2 missing values",
                    "missing_values": [
                        {"index": 1, "value": "NaN"},
                        {"index": 2, "value": "NaN"}
                    ]
                },
                "B": {"missing_count": 0, "status": "OK", "missing_values": []}
            })
        );
    }

    #[test]
    fn test_missing_values_unknown_column() {
        let t = table(vec![("A", vec![Cell::Int(1)])]);
        let out = run(&MissingValues, &t, json!({"columns": ["Z"]}));
        assert_eq!(out, json!({"Z": {"error": "Column 'Z' not found"}}));
    }

    #[test]
    fn test_missing_values_bad_option_fails() {
        let t = table(vec![("A", vec![Cell::Int(1)])]);
        let err = MissingValues
            .run(&t, &TaskConfig::from(json!({"columns": "A"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Option 'columns' must be a list of strings");
    }

    #[test]
    fn test_blank_names() {
        let t = table(vec![("Name", vec![s("Ann"), s(""), Cell::Null, s(" ")])]);
        let out = run(&NameConsistency, &t, json!({}));
        assert_eq!(
            out,
            json!({
                "Name": {
                    "blank_name_count": 2,
                    "status": "2 blank names found",
                    "blank_entries": [
                        {"index": 1, "value": ""},
                        {"index": 2, "value": null}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_blank_names_custom_column() {
        let t = table(vec![("Full_Name", vec![s("Ann")])]);
        let out = run(&NameConsistency, &t, json!({"column": "Full_Name"}));
        assert_eq!(out["Full_Name"]["status"], json!("OK"));
        let out = run(&NameConsistency, &t, json!({}));
        assert_eq!(out, json!({"Name": {"error": "Column 'Name' not found"}}));
    }
}
