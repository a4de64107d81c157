//! Registry of named check tasks.
//!
//! Names are unique. `add` never overwrites and `update` never inserts; both
//! report what happened through [`RegistryStatus`] instead of failing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::task::CheckTask;

/// Outcome of a registry mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryStatus {
    Added,
    AlreadyExists,
    Updated,
    DoesNotExist,
}

impl RegistryStatus {
    /// Whether the registry changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, RegistryStatus::Added | RegistryStatus::Updated)
    }

    /// Human-readable message for task `name`.
    pub fn message(&self, name: &str) -> String {
        match self {
            RegistryStatus::Added => format!("Task '{}' has been added successfully.", name),
            RegistryStatus::AlreadyExists => {
                format!("Task '{}' already exists in the library.", name)
            }
            RegistryStatus::Updated => format!("Task '{}' has been updated successfully.", name),
            RegistryStatus::DoesNotExist => {
                format!("Task '{}' does not exist. Please add it first.", name)
            }
        }
    }
}

/// Information about a registered task for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInfo {
    pub name: String,
    pub description: String,
}

/// Registry of available check tasks.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<dyn CheckTask>>,
}

impl TaskRegistry {
    /// Create an empty registry (no built-in checks).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in check under its own name.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for task in crate::checks::default_tasks() {
            let name = task.name().to_string();
            registry.add(name, task);
        }
        tracing::info!("Task registry ready with {} checks", registry.len());
        registry
    }

    /// Register `task` under `name` unless the name is taken.
    pub fn add(&mut self, name: impl Into<String>, task: Arc<dyn CheckTask>) -> RegistryStatus {
        let name = name.into();
        if self.tasks.contains_key(&name) {
            tracing::debug!("Task '{}' already registered, keeping existing", name);
            return RegistryStatus::AlreadyExists;
        }
        tracing::debug!("Registering task '{}'", name);
        self.tasks.insert(name, task);
        RegistryStatus::Added
    }

    /// Replace the task registered under `name`, if there is one.
    pub fn update(&mut self, name: impl Into<String>, task: Arc<dyn CheckTask>) -> RegistryStatus {
        let name = name.into();
        match self.tasks.get_mut(&name) {
            Some(slot) => {
                tracing::debug!("Updating task '{}'", name);
                *slot = task;
                RegistryStatus::Updated
            }
            None => RegistryStatus::DoesNotExist,
        }
    }

    /// Look up a task. Absence is a normal outcome.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CheckTask>> {
        self.tasks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// List registered tasks sorted by name.
    pub fn list(&self) -> Vec<TaskInfo> {
        let mut list: Vec<_> = self
            .tasks
            .iter()
            .map(|(name, task)| TaskInfo {
                name: name.clone(),
                description: task.description().to_string(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.tasks.keys().collect();
        names.sort();
        f.debug_struct("TaskRegistry").field("tasks", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::task::FnTask;
    use crate::pipeline::value::TaskValue;

    fn task(label: &'static str) -> Arc<dyn CheckTask> {
        Arc::new(FnTask::new(label, label, move |_, _| Ok(TaskValue::from(label))))
    }

    #[test]
    fn test_add_then_get() {
        let mut registry = TaskRegistry::empty();
        let f = task("f");
        assert_eq!(registry.add("n", Arc::clone(&f)), RegistryStatus::Added);
        assert!(Arc::ptr_eq(&registry.get("n").unwrap(), &f));
    }

    #[test]
    fn test_add_existing_keeps_first() {
        let mut registry = TaskRegistry::empty();
        let f = task("f");
        registry.add("n", Arc::clone(&f));
        assert_eq!(registry.add("n", task("f2")), RegistryStatus::AlreadyExists);
        assert!(Arc::ptr_eq(&registry.get("n").unwrap(), &f));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_existing() {
        let mut registry = TaskRegistry::empty();
        registry.add("n", task("f"));
        let f2 = task("f2");
        assert_eq!(registry.update("n", Arc::clone(&f2)), RegistryStatus::Updated);
        assert!(Arc::ptr_eq(&registry.get("n").unwrap(), &f2));
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut registry = TaskRegistry::empty();
        registry.add("a", task("a"));
        assert_eq!(registry.update("n", task("f")), RegistryStatus::DoesNotExist);
        assert!(registry.get("n").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            RegistryStatus::Added.message("x"),
            "Task 'x' has been added successfully."
        );
        assert_eq!(
            RegistryStatus::DoesNotExist.message("x"),
            "Task 'x' does not exist. Please add it first."
        );
        assert!(RegistryStatus::Updated.is_applied());
        assert!(!RegistryStatus::AlreadyExists.is_applied());
    }

    #[test]
    fn test_defaults_registered() {
        let registry = TaskRegistry::with_defaults();
        assert_eq!(registry.len(), 7);
        for name in [
            "check_missing_values",
            "check_duplicates",
            "check_date_formats",
            "check_email_format",
            "check_gender_consistency",
            "check_name_consistency",
            "check_age_validity",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        let names: Vec<_> = registry.list().into_iter().map(|t| t.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
