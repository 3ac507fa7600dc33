//! File operations module
//!
//! This module contains directory creation, minifier invocation and the per-file transform.

mod directories;
mod tool;
mod transformer;

pub use directories::materialize_directories;
pub use tool::{ToolRun, command_line, run_tool};
pub use transformer::{FileKind, FileMapping, TransformStats, classify, transform_files};
