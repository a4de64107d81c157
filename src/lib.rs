//! # dq_pipeline
//!
//! Runs a configurable sequence of data-quality checks against a tabular
//! dataset and returns one structured report per check.
//!
//! ## Flow
//! 1. Load the dataset into a read-only [`table::Table`]
//! 2. Resolve each requested check by name in the [`pipeline::TaskRegistry`]
//! 3. Run the checks in request order, each behind its own fault boundary
//! 4. Normalize every result into plain JSON and return the ordered reports
//!
//! ## Modules
//! - `table`: columnar dataset and CSV loader
//! - `pipeline`: task contract, registry, runner and value normalization
//! - `checks`: built-in checks (missing values, duplicates, formats, ranges)
//! - `api`: axum HTTP surface

pub mod api;
pub mod checks;
pub mod config;
pub mod pipeline;
pub mod table;
pub mod util;

pub use config::Config;
pub use pipeline::{Invocation, Pipeline, Report, RunResult, TaskRegistry};
pub use table::{load_table, Table};
