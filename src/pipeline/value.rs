//! Task output values and their conversion to wire-safe JSON.
//!
//! Check tasks build [`TaskValue`] trees. Those trees may carry native numeric
//! [`Scalar`]s (cell values, row indices, counts) straight out of the table
//! scan. [`normalize`] is the single boundary where a tree becomes a plain
//! `serde_json::Value` made only of maps, arrays, strings, numbers, booleans
//! and null.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::table::Cell;

/// Native numeric values produced during a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I64(i64),
    U64(u64),
    Usize(usize),
    F64(f64),
}

/// Output tree of a check task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<TaskValue>),
    Map(BTreeMap<String, TaskValue>),
    Scalar(Scalar),
}

impl TaskValue {
    /// An empty map, the starting point of most results.
    pub fn map() -> Self {
        TaskValue::Map(BTreeMap::new())
    }

    /// Insert into a map value. No-op on anything else.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TaskValue>) {
        if let TaskValue::Map(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Builder-style [`TaskValue::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TaskValue>) -> Self {
        self.insert(key, value);
        self
    }
}

impl From<Scalar> for TaskValue {
    fn from(s: Scalar) -> Self {
        TaskValue::Scalar(s)
    }
}

impl From<usize> for TaskValue {
    fn from(n: usize) -> Self {
        TaskValue::Scalar(Scalar::Usize(n))
    }
}

impl From<bool> for TaskValue {
    fn from(b: bool) -> Self {
        TaskValue::Bool(b)
    }
}

impl From<&str> for TaskValue {
    fn from(s: &str) -> Self {
        TaskValue::String(s.to_string())
    }
}

impl From<String> for TaskValue {
    fn from(s: String) -> Self {
        TaskValue::String(s)
    }
}

impl<T: Into<TaskValue>> From<Vec<T>> for TaskValue {
    fn from(items: Vec<T>) -> Self {
        TaskValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, TaskValue>> for TaskValue {
    fn from(map: BTreeMap<String, TaskValue>) -> Self {
        TaskValue::Map(map)
    }
}

impl From<&Cell> for TaskValue {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Null => TaskValue::Null,
            Cell::Bool(b) => TaskValue::Bool(*b),
            Cell::Int(i) => TaskValue::Scalar(Scalar::I64(*i)),
            Cell::Float(f) => TaskValue::Scalar(Scalar::F64(*f)),
            Cell::Str(s) => TaskValue::String(s.clone()),
        }
    }
}

impl From<Value> for TaskValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TaskValue::Null,
            Value::Bool(b) => TaskValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    TaskValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    TaskValue::Scalar(Scalar::U64(u))
                } else {
                    TaskValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => TaskValue::String(s),
            Value::Array(items) => TaskValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                TaskValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Convert a task output tree into plain JSON.
///
/// Never fails: a float with no JSON representation (NaN, infinity) becomes
/// `null`.
pub fn normalize(value: TaskValue) -> Value {
    match value {
        TaskValue::Null => Value::Null,
        TaskValue::Bool(b) => Value::Bool(b),
        TaskValue::Int(i) => Value::Number(i.into()),
        TaskValue::Float(f) => float(f),
        TaskValue::String(s) => Value::String(s),
        TaskValue::List(items) => Value::Array(items.into_iter().map(normalize).collect()),
        TaskValue::Map(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .collect::<Map<String, Value>>(),
        ),
        TaskValue::Scalar(scalar) => match scalar {
            Scalar::I64(i) => Value::Number(i.into()),
            Scalar::U64(u) => Value::Number(u.into()),
            Scalar::Usize(n) => Value::Number((n as u64).into()),
            Scalar::F64(f) => float(f),
        },
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}
