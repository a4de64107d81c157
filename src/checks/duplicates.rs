//! Duplicate row detection.

use std::collections::{BTreeMap, HashMap};

use crate::pipeline::{CheckTask, TaskConfig, TaskValue};
use crate::table::{Cell, Column, Table};

use super::{column_not_found, entry, status};

/// Hashable identity of a non-null cell. Integral floats compare equal to
/// the matching integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
}

impl CellKey {
    fn of(cell: &Cell) -> Option<Self> {
        match cell {
            _ if cell.is_null() => None,
            Cell::Null => None,
            Cell::Bool(b) => Some(CellKey::Bool(*b)),
            Cell::Int(i) => Some(CellKey::Int(*i)),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
                Some(CellKey::Int(*f as i64))
            }
            Cell::Float(f) => Some(CellKey::Float(f.to_bits())),
            Cell::Str(s) => Some(CellKey::Str(s.clone())),
        }
    }
}

/// Report rows whose target-column values repeat in another row.
///
/// Options: `columns` (default: every column), `id` (column reported for
/// each duplicate row instead of its values). Rows with a null in any target
/// or id column are not considered. Every row of a duplicate group is
/// reported, including the first occurrence.
pub struct Duplicates;

impl CheckTask for Duplicates {
    fn name(&self) -> &str {
        "check_duplicates"
    }

    fn description(&self) -> &str {
        "Find rows whose values repeat across the target columns."
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        let columns = config.columns_or(table.column_names())?;
        if columns.is_empty() {
            anyhow::bail!("No columns specified for duplicate check");
        }

        let absent: Vec<&String> = columns.iter().filter(|c| !table.has_column(c)).collect();
        if !absent.is_empty() {
            let mut result = TaskValue::map();
            for name in absent {
                result.insert(name.clone(), column_not_found(name));
            }
            return Ok(result);
        }
        let targets: Vec<&Column> = columns.iter().filter_map(|c| table.column(c)).collect();

        let id_column = match config.string("id")? {
            Some(id) => {
                let column = table.column(&id);
                if column.is_none() {
                    tracing::warn!("Duplicate check: id column '{}' not found, reporting values", id);
                }
                column
            }
            None => None,
        };

        // Surviving rows and their keys
        let mut keyed: Vec<(usize, Vec<CellKey>)> = Vec::new();
        'rows: for row in 0..table.row_count() {
            if id_column.is_some_and(|id| id.get(row).map_or(true, Cell::is_null)) {
                continue;
            }
            let mut key = Vec::with_capacity(targets.len());
            for column in &targets {
                match column.get(row).and_then(CellKey::of) {
                    Some(k) => key.push(k),
                    None => continue 'rows,
                }
            }
            keyed.push((row, key));
        }

        let mut counts: HashMap<&[CellKey], usize> = HashMap::new();
        for (_, key) in &keyed {
            *counts.entry(key.as_slice()).or_insert(0) += 1;
        }

        let duplicates: Vec<TaskValue> = keyed
            .iter()
            .filter(|(_, key)| counts.get(key.as_slice()).copied().unwrap_or(0) > 1)
            .map(|(row, _)| {
                let value = match id_column {
                    Some(id) => id.get(*row).map(TaskValue::from).unwrap_or(TaskValue::Null),
                    None => TaskValue::Map(
                        targets
                            .iter()
                            .map(|c| {
                                let v = c.get(*row).map(TaskValue::from);
                                (c.name().to_string(), v.unwrap_or(TaskValue::Null))
                            })
                            .collect::<BTreeMap<_, _>>(),
                    ),
                };
                entry(*row, value)
            })
            .collect();

        let count = duplicates.len();
        Ok(TaskValue::map()
            .with("duplicate_count", count)
            .with("status", status(count, "duplicates"))
            .with("duplicate_rows", duplicates))
    }
}
