//! Workflow module
//!
//! This module contains the pipeline that orchestrates the stages of a run.

mod context;
mod engine;

pub use context::{RunReport, RunStats, RunStatus};
pub use engine::Pipeline;
