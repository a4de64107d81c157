//! Task pipeline engine.
//!
//! - `task`: the [`CheckTask`] contract and per-invocation [`TaskConfig`]
//! - `registry`: named task lookup with add/update semantics
//! - `runner`: ordered, fault-isolated execution over one table
//! - `value`: task output trees and the JSON normalization boundary

pub mod registry;
pub mod runner;
pub mod task;
pub mod value;

pub use registry::{RegistryStatus, TaskInfo, TaskRegistry};
pub use runner::{Invocation, Pipeline, Report, RunPlan, RunResult, UnresolvedTask, UNKNOWN_TASK};
pub use task::{CheckTask, ConfigOptionError, FnTask, TaskConfig};
pub use value::{normalize, Scalar, TaskValue};
