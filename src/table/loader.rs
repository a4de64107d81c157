//! CSV dataset loading.
//!
//! The first record is the header. Every field is classified on its own
//! (null marker, integer, float, boolean, text) and each column is then
//! reconciled to a single type: integers widen to floats next to floats, and
//! a column whose cells disagree falls back to its raw text.

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::{Cell, Column, ColumnType, Table, TableError};

/// Field values read as missing.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Shape(#[from] TableError),

    #[error("No columns to parse from file")]
    Empty,
}

/// Load a table from a CSV file.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        tracing::error!("Error loading dataset {}: {}", path.display(), e);
        LoadError::Io(e)
    })?;
    let table = load_table_from_reader(file).map_err(|e| {
        tracing::error!("Error loading dataset {}: {}", path.display(), e);
        e
    })?;
    tracing::debug!(
        "Loaded dataset {} ({} rows x {} columns)",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Load a table from any CSV byte source.
pub fn load_table_from_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(LoadError::Empty);
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            raw[i].push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, fields)| build_column(name, fields))
        .collect();
    Ok(Table::from_columns(columns)?)
}

fn build_column(name: String, fields: Vec<String>) -> Column {
    let parsed: Vec<Cell> = fields.iter().map(|f| parse_field(f)).collect();
    let cells = match ColumnType::infer(&parsed) {
        ColumnType::Float => parsed
            .into_iter()
            .map(|c| match c {
                Cell::Int(i) => Cell::Float(i as f64),
                other => other,
            })
            .collect(),
        ColumnType::Mixed => parsed
            .into_iter()
            .zip(fields)
            .map(|(c, raw)| if c.is_null() { Cell::Null } else { Cell::Str(raw) })
            .collect(),
        _ => parsed,
    };
    Column::new(name, cells)
}

fn parse_field(field: &str) -> Cell {
    if NULL_MARKERS.contains(&field) {
        return Cell::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Cell::Int(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return Cell::Float(f);
    }
    if field.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }
    Cell::Str(field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_typed_columns() {
        let data = "ID,Name,Age,Score\n1,Ann,25,1.5\n2,,abc,2\n3,Bo,,NaN\n";
        let table = load_table_from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), vec!["ID", "Name", "Age", "Score"]);
        assert_eq!(table.column("ID").unwrap().dtype(), ColumnType::Int);
        assert_eq!(table.column("Name").unwrap().dtype(), ColumnType::Str);
        assert!(table.is_null(1, "Name"));

        // Mixed column keeps the raw text
        assert_eq!(table.column("Age").unwrap().dtype(), ColumnType::Str);
        assert_eq!(table.cell(0, "Age"), Some(&Cell::Str("25".into())));
        assert!(table.is_null(2, "Age"));

        // Ints widen next to floats
        assert_eq!(table.column("Score").unwrap().dtype(), ColumnType::Float);
        assert_eq!(table.cell(1, "Score"), Some(&Cell::Float(2.0)));
        assert!(table.is_null(2, "Score"));
    }

    #[test]
    fn test_ragged_rows_fail() {
        let data = "a,b\n1,2\n3\n";
        assert!(matches!(
            load_table_from_reader(data.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            load_table_from_reader("".as_bytes()),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Email,Active").unwrap();
        writeln!(file, "a@b.com,true").unwrap();
        writeln!(file, "bad,FALSE").unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("Active").unwrap().dtype(), ColumnType::Bool);
        assert_eq!(table.cell(1, "Email"), Some(&Cell::Str("bad".into())));
    }
}
