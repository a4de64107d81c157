//! Pipeline runner.
//!
//! Applies an ordered list of invocations to one table. Each invocation runs
//! inside its own fault boundary: an error or a panic inside a check becomes
//! an error report for that slot and the run continues with the next one.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::registry::TaskRegistry;
use super::task::{CheckTask, TaskConfig};
use super::value::normalize;
use crate::table::Table;

/// Message reported for names the registry does not know, when unresolved
/// names are reported rather than skipped.
pub const UNKNOWN_TASK: &str = "unknown task";

/// One requested application of a named task.
///
/// On the wire the options sit inline next to the name:
/// `{"name": "check_email_format", "column": "Mail"}`. A missing or
/// non-string name reads as the empty name, which never resolves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(flatten)]
    pub config: TaskConfig,
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => name,
        _ => String::new(),
    })
}

impl Invocation {
    pub fn new(name: impl Into<String>, config: TaskConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// An invocation with default options.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, TaskConfig::default())
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    Failure { task: String, error: String },
    Success { task: String, result: Value },
}

impl Report {
    pub fn task(&self) -> &str {
        match self {
            Report::Success { task, .. } | Report::Failure { task, .. } => task,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Report::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            Report::Success { result, .. } => Some(result),
            Report::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Report::Success { .. } => None,
            Report::Failure { error, .. } => Some(error),
        }
    }
}

/// Reports of one run, in request order.
pub type RunResult = Vec<Report>;

/// What to do with an invocation whose name is not registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedTask {
    /// Drop the invocation; the run result has no entry for it.
    #[default]
    Skip,
    /// Emit `{task, error: "unknown task"}` so every invocation has a report.
    Report,
}

/// Pipeline bound to a registry.
pub struct Pipeline<'a> {
    registry: &'a TaskRegistry,
    unresolved: UnresolvedTask,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a TaskRegistry) -> Self {
        Self {
            registry,
            unresolved: UnresolvedTask::default(),
        }
    }

    pub fn unresolved(mut self, policy: UnresolvedTask) -> Self {
        self.unresolved = policy;
        self
    }

    /// Resolve every invocation against the registry.
    ///
    /// The returned plan owns its tasks, so the registry can be released (or
    /// mutated) while the plan executes.
    pub fn plan(&self, invocations: Vec<Invocation>) -> RunPlan {
        let steps = invocations
            .into_iter()
            .map(|invocation| {
                let task = self.registry.get(&invocation.name);
                (invocation, task)
            })
            .collect();
        RunPlan {
            steps,
            unresolved: self.unresolved,
        }
    }

    /// Run `invocations` against `table`.
    pub fn run(&self, table: &Table, invocations: Vec<Invocation>) -> RunResult {
        self.plan(invocations).execute(table)
    }
}

/// Invocations resolved to tasks, ready to execute.
pub struct RunPlan {
    steps: Vec<(Invocation, Option<Arc<dyn CheckTask>>)>,
    unresolved: UnresolvedTask,
}

impl RunPlan {
    /// Execute every step in order.
    pub fn execute(self, table: &Table) -> RunResult {
        let run_id = Uuid::new_v4().to_string()[..8].to_string();
        tracing::info!(
            "Run {} starting: {} invocations over {} rows",
            run_id,
            self.steps.len(),
            table.row_count()
        );

        let mut results = Vec::with_capacity(self.steps.len());
        for (invocation, task) in self.steps {
            let Some(task) = task else {
                tracing::warn!("Run {}: task '{}' is not registered", run_id, invocation.name);
                if self.unresolved == UnresolvedTask::Report {
                    results.push(Report::Failure {
                        task: invocation.name,
                        error: UNKNOWN_TASK.to_string(),
                    });
                }
                continue;
            };
            results.push(run_one(&run_id, task.as_ref(), invocation, table));
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            "Run {} finished: {} reports, {} failed",
            run_id,
            results.len(),
            failed
        );
        results
    }
}

fn run_one(run_id: &str, task: &dyn CheckTask, invocation: Invocation, table: &Table) -> Report {
    let Invocation { name, config } = invocation;
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.run(table, &config)));
    tracing::debug!(
        "Run {}: task '{}' took {:?}",
        run_id,
        name,
        started.elapsed()
    );

    match outcome {
        Ok(Ok(value)) => Report::Success {
            task: name,
            result: normalize(value),
        },
        Ok(Err(e)) => {
            tracing::error!("Error running task {}: {}", name, e);
            Report::Failure {
                task: name,
                error: e.to_string(),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("Task {} panicked: {}", name, message);
            Report::Failure {
                task: name,
                error: message,
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
