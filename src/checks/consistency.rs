//! Categorical consistency checks.

use crate::pipeline::{CheckTask, TaskConfig, TaskValue};
use crate::table::{Cell, Table};

use super::{single_column, status, violations};

/// Canonical form of a lower-cased gender label.
fn standardize_gender(lower: &str) -> &str {
    match lower {
        "male" => "M",
        "female" => "F",
        "" => "Unknown",
        other => other,
    }
}

/// Whether a gender cell is already in canonical form. Cells without text
/// (null, numbers) never are.
fn is_consistent_gender(cell: &Cell) -> bool {
    match cell {
        Cell::Str(s) => {
            let lower = s.to_lowercase();
            standardize_gender(&lower) == lower
        }
        _ => false,
    }
}

/// Report gender labels that would change under standardization.
///
/// Options: `column` (default `Gender`).
pub struct GenderConsistency;

impl CheckTask for GenderConsistency {
    fn name(&self) -> &str {
        "check_gender_consistency"
    }

    fn description(&self) -> &str {
        "Find gender labels not already in canonical form (e.g. 'male' instead of 'M')."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let column = config.column_or("Gender")?;
        Ok(single_column(table, &column, |col| {
            let inconsistent = violations(col, |cell| !is_consistent_gender(cell));
            TaskValue::map()
                .with("inconsistent_gender_count", inconsistent.len())
                .with(
                    "status",
                    status(inconsistent.len(), "inconsistent genders"),
                )
                .with("inconsistent_entries", inconsistent)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{run, s, table};
    use serde_json::json;

    #[test]
    fn test_standardize() {
        assert_eq!(standardize_gender("male"), "M");
        assert_eq!(standardize_gender("female"), "F");
        assert_eq!(standardize_gender(""), "Unknown");
        assert_eq!(standardize_gender("m"), "m");
    }

    #[test]
    fn test_gender_consistency() {
        let t = table(vec![(
            "Gender",
            vec![s("M"), s("Male"), s("f"), s("FEMALE"), s(""), Cell::Null, s("other")],
        )]);
        let out = run(&GenderConsistency, &t, json!({}));
        assert_eq!(
            out,
            json!({
                "Gender": {
                    "inconsistent_gender_count": 4,
                    "status": "4 inconsistent genders found",
                    "inconsistent_entries": [
                        {"index": 1, "value": "Male"},
                        {"index": 3, "value": "FEMALE"},
                        {"index": 4, "value": ""},
                        {"index": 5, "value": null}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_all_consistent() {
        let t = table(vec![("Sex", vec![s("M"), s("F")])]);
        let out = run(&GenderConsistency, &t, json!({"column": "Sex"}));
        assert_eq!(
            out,
            json!({"Sex": {"inconsistent_gender_count": 0, "status": "OK", "inconsistent_entries": []}})
        );
    }
}
