//! In-memory columnar dataset.
//!
//! A [`Table`] is a set of named, typed columns of equal length. Rows are
//! addressed by their position (`0..row_count()`), which stays stable for the
//! lifetime of the table. Check tasks only ever borrow a table immutably.

pub mod loader;

pub use loader::{load_table, LoadError};

use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    /// Whether the cell is absent. Non-finite floats count as absent, the same
    /// way a NaN marks a missing numeric value.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "nan"),
            Cell::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{:?}", v),
            Cell::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Column type inferred from the non-null cells of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Str,
    /// Heterogeneous cells, or no non-null cells at all.
    Mixed,
}

impl ColumnType {
    /// Infer the type of a column from its cells.
    pub fn infer(cells: &[Cell]) -> Self {
        let mut inferred: Option<ColumnType> = None;
        for cell in cells.iter().filter(|c| !c.is_null()) {
            let kind = match cell {
                Cell::Int(_) => ColumnType::Int,
                Cell::Float(_) => ColumnType::Float,
                Cell::Bool(_) => ColumnType::Bool,
                Cell::Str(_) => ColumnType::Str,
                Cell::Null => continue,
            };
            inferred = Some(match (inferred, kind) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Int), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Int) => ColumnType::Float,
                _ => return ColumnType::Mixed,
            });
        }
        inferred.unwrap_or(ColumnType::Mixed)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let dtype = ColumnType::infer(&cells);
        Self {
            name: name.into(),
            dtype,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    /// Iterate over `(row_index, cell)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().enumerate()
    }
}

/// Errors raised when assembling a table by hand.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// A read-only columnar dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns. All columns must have the same length and
    /// distinct names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
            if col.len() != row_count {
                return Err(TableError::LengthMismatch {
                    name: col.name.clone(),
                    expected: row_count,
                    actual: col.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    /// Ordered column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.column(column).and_then(|c| c.get(row))
    }

    /// Whether the cell at `(row, column)` is null. Out-of-range positions are
    /// treated as null.
    pub fn is_null(&self, row: usize, column: &str) -> bool {
        self.cell(row, column).map(Cell::is_null).unwrap_or(true)
    }
}
