//! Check task contract.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::value::TaskValue;
use crate::table::Table;

/// Trait for implementing data-quality checks.
///
/// A check scans a borrowed table and returns a result tree. Returning an
/// error (or panicking) only fails this invocation; the runner records the
/// message and moves on.
pub trait CheckTask: Send + Sync {
    /// The unique name of this check.
    fn name(&self) -> &str;

    /// A description of what this check looks for.
    fn description(&self) -> &str;

    /// Run the check over `table` with per-invocation options.
    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue>;
}

/// Errors reading a per-invocation option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigOptionError {
    #[error("Option '{0}' must be a list of strings")]
    ExpectedStringList(String),

    #[error("Option '{0}' must be a string")]
    ExpectedString(String),
}

/// Options for one task invocation.
///
/// Holds every key of the invocation object except `name`. Unknown keys are
/// kept but ignored by the built-in checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskConfig {
    options: Map<String, Value>,
}

impl TaskConfig {
    pub fn new(options: Map<String, Value>) -> Self {
        Self { options }
    }

    /// Read a string-list option. Absent or `null` yields `None`.
    pub fn string_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigOptionError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ConfigOptionError::ExpectedStringList(key.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(ConfigOptionError::ExpectedStringList(key.to_string())),
        }
    }

    /// Read a string option. Absent or `null` yields `None`.
    pub fn string(&self, key: &str) -> Result<Option<String>, ConfigOptionError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ConfigOptionError::ExpectedString(key.to_string())),
        }
    }

    /// The `columns` option, or `default` when absent.
    pub fn columns_or(&self, default: Vec<String>) -> Result<Vec<String>, ConfigOptionError> {
        Ok(self.string_list("columns")?.unwrap_or(default))
    }

    /// The `column` option, or `default` when absent.
    pub fn column_or(&self, default: &str) -> Result<String, ConfigOptionError> {
        Ok(self.string("column")?.unwrap_or_else(|| default.to_string()))
    }
}

impl From<Value> for TaskConfig {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(options) => Self::new(options),
            _ => Self::default(),
        }
    }
}

type CheckFn = dyn Fn(&Table, &TaskConfig) -> anyhow::Result<TaskValue> + Send + Sync;

/// A check backed by a closure or function pointer.
#[derive(Clone)]
pub struct FnTask {
    name: String,
    description: String,
    func: Arc<CheckFn>,
}

impl FnTask {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Table, &TaskConfig) -> anyhow::Result<TaskValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for FnTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").field("name", &self.name).finish()
    }
}

impl CheckTask for FnTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn run(&self, table: &Table, config: &TaskConfig) -> anyhow::Result<TaskValue> {
        (self.func)(table, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_default_when_absent() {
        let config = TaskConfig::from(json!({"unrelated": 1}));
        assert_eq!(config.column_or("Email").unwrap(), "Email");
        assert_eq!(
            config.columns_or(vec!["a".into()]).unwrap(),
            vec!["a".to_string()]
        );
        assert_eq!(config.string("id").unwrap(), None);
    }

    #[test]
    fn test_options_read_values() {
        let config = TaskConfig::from(json!({"columns": ["x", "y"], "column": "Mail", "id": null}));
        assert_eq!(config.columns_or(vec![]).unwrap(), vec!["x", "y"]);
        assert_eq!(config.column_or("Email").unwrap(), "Mail");
        assert_eq!(config.string("id").unwrap(), None);
    }

    #[test]
    fn test_options_wrong_type() {
        let config = TaskConfig::from(json!({"columns": "x", "column": 3}));
        assert_eq!(
            config.columns_or(vec![]).unwrap_err(),
            ConfigOptionError::ExpectedStringList("columns".into())
        );
        assert_eq!(
            config.column_or("Email").unwrap_err(),
            ConfigOptionError::ExpectedString("column".into())
        );
        let config = TaskConfig::from(json!({"columns": ["x", 1]}));
        assert!(config.string_list("columns").is_err());
    }

    #[test]
    fn test_fn_task_runs_closure() {
        let task = FnTask::new("row_count", "Counts rows", |table, _| {
            Ok(TaskValue::from(table.row_count()))
        });
        assert_eq!(task.name(), "row_count");
        assert_eq!(task.description(), "Counts rows");
        let out = task.run(&Table::default(), &TaskConfig::default()).unwrap();
        assert_eq!(out, TaskValue::from(0usize));
    }
}
