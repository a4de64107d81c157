//! Format checks: day/month/year dates and e-mail addresses.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::pipeline::{CheckTask, TaskConfig, TaskValue};
use crate::table::{Cell, Table};

use super::{column_not_found, single_column, status, violations};

/// Accepted date layout.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Columns checked when no `columns` option is given.
pub const DEFAULT_DATE_COLUMNS: &[&str] = &["Join_Date", "Last_Login"];

/// Digits-only `d/m/yyyy` shape. `%Y` alone would also take short or signed
/// years and leading whitespace.
const DATE_SHAPE_PATTERN: &str = r"^\d{1,2}/\d{1,2}/\d{4}$";

/// `local@domain.tld`: no `@` in any part, at least one `.` after the `@`.
/// Matched as a prefix of the cell text.
const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

fn date_shape_regex() -> &'static Regex {
    static DATE_SHAPE: OnceLock<Regex> = OnceLock::new();
    DATE_SHAPE.get_or_init(|| Regex::new(DATE_SHAPE_PATTERN).expect("date pattern is valid"))
}

/// Whether a cell holds a `dd/mm/yyyy` date. Null cells pass.
fn is_valid_date(cell: &Cell) -> bool {
    match cell {
        _ if cell.is_null() => true,
        Cell::Str(s) => {
            date_shape_regex().is_match(s) && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
        }
        _ => false,
    }
}

/// Report dates not in `dd/mm/yyyy` form.
///
/// Options: `columns` (default `Join_Date`, `Last_Login`).
pub struct DateFormats;

impl CheckTask for DateFormats {
    fn name(&self) -> &str {
        "check_date_formats"
    }

    fn description(&self) -> &str {
        "Find dates that do not parse as day/month/year."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let default = DEFAULT_DATE_COLUMNS.iter().map(|c| c.to_string()).collect();
        let columns = config.columns_or(default)?;
        let mut result = TaskValue::map();

        for name in columns {
            let Some(column) = table.column(&name) else {
                result.insert(name.clone(), column_not_found(&name));
                continue;
            };

            let inconsistent = violations(column, |cell| !is_valid_date(cell));
            let consistent = inconsistent.is_empty();
            result.insert(
                name,
                TaskValue::map()
                    .with(
                        "date_format",
                        if consistent { "Consistent" } else { "Inconsistent" },
                    )
                    .with(
                        "status",
                        if consistent {
                            "OK"
                        } else {
                            "Inconsistent date format found"
                        },
                    )
                    .with("inconsistent_entries", inconsistent),
            );
        }
        Ok(result)
    }
}

/// Report malformed e-mail addresses.
///
/// Options: `column` (default `Email`).
pub struct EmailFormat;

impl CheckTask for EmailFormat {
    fn name(&self) -> &str {
        "check_email_format"
    }

    fn description(&self) -> &str {
        "Find values that are not shaped like local@domain.tld."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let column = config.column_or("Email")?;
        let regex = email_regex();
        Ok(single_column(table, &column, |col| {
            let invalid = violations(col, |cell| !regex.is_match(&cell.to_string()));
            TaskValue::map()
                .with("invalid_email_count", invalid.len())
                .with("status", status(invalid.len(), "invalid emails"))
                .with("invalid_emails", invalid)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{run, s, table};
    use serde_json::json;

    #[test]
    fn test_email_scenario() {
        let t = table(vec![("Email", vec![s("a@b.com"), s("bad-email"), s("x@y.z")])]);
        let out = run(&EmailFormat, &t, json!({}));
        assert_eq!(
            out,
            json!({
                "Email": {
                    "invalid_email_count": 1,
                    "status": "1 invalid emails found",
                    "invalid_emails": [{"index": 1, "value": "bad-email"}]
                }
            })
        );
    }

    #[test]
    fn test_email_edge_cases() {
        let t = table(vec![(
            "Mail",
            vec![
                s("a@@b.com"),
                s("a@b"),
                Cell::Null,
                s("first.last@sub.example.org"),
                s("@b.com"),
            ],
        )]);
        let out = run(&EmailFormat, &t, json!({"column": "Mail"}));
        let indices: Vec<_> = out["Mail"]["invalid_emails"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["index"].as_u64().unwrap())
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 4]);
        assert_eq!(out["Mail"]["invalid_email_count"], json!(4));
    }

    #[test]
    fn test_email_missing_column() {
        let t = table(vec![("Name", vec![s("Ann")])]);
        let out = run(&EmailFormat, &t, json!({}));
        assert_eq!(out, json!({"Email": {"error": "Column 'Email' not found"}}));
    }

    #[test]
    fn test_dates_default_columns() {
        let t = table(vec![
            ("Join_Date", vec![s("01/02/2020"), s("2020-02-01"), Cell::Null, s("31/02/2020")]),
            ("Last_Login", vec![s("15/06/2023"), s("1/7/2023"), s("15/06/2023"), s("01/01/1999")]),
        ]);
        let out = run(&DateFormats, &t, json!({}));
        assert_eq!(
            out["Join_Date"],
            json!({
                "date_format": "Inconsistent",
                "status": "Inconsistent date format found",
                "inconsistent_entries": [
                    {"index": 1, "value": "2020-02-01"},
                    {"index": 3, "value": "31/02/2020"}
                ]
            })
        );
        assert_eq!(
            out["Last_Login"],
            json!({"date_format": "Consistent", "status": "OK", "inconsistent_entries": []})
        );
    }

    #[test]
    fn test_dates_require_four_digit_year() {
        let t = table(vec![(
            "Join_Date",
            vec![
                s("15/06/23"),
                s("1/2/5"),
                s("15/06/+2023"),
                s(" 15/06/2023"),
                s("15/06/2023 "),
                s("5/6/2023"),
            ],
        )]);
        let out = run(&DateFormats, &t, json!({"columns": ["Join_Date"]}));
        assert_eq!(out["Join_Date"]["date_format"], json!("Inconsistent"));
        assert_eq!(
            out["Join_Date"]["inconsistent_entries"],
            json!([
                {"index": 0, "value": "15/06/23"},
                {"index": 1, "value": "1/2/5"},
                {"index": 2, "value": "15/06/+2023"},
                {"index": 3, "value": " 15/06/2023"},
                {"index": 4, "value": "15/06/2023 "}
            ])
        );
    }

    #[test]
    fn test_dates_non_text_and_missing_columns() {
        let t = table(vec![("Signup", vec![Cell::Int(20200101)])]);
        let out = run(&DateFormats, &t, json!({"columns": ["Signup", "Gone"]}));
        assert_eq!(out["Signup"]["inconsistent_entries"], json!([{"index": 0, "value": 20200101}]));
        assert_eq!(out["Gone"], json!({"error": "Column 'Gone' not found"}));
    }
}
