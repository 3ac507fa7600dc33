//! Copies a style sheet or script tree into a version stamped folder.
//!
//! The source tree is scanned, every directory is recreated with the version
//! inserted after the configured path segment, asset files are sent through
//! an external minifier such as the YUI compressor and pass-through files are
//! copied as they are.
//!
//! ```no_run
//! use versioned_minify::prelude::*;
//!
//! # fn main() -> versioned_minify::prelude::Result<()> {
//! let config = Config::builder("/www/public/css", "1112v4", AssetType::Style)
//!     .tool_executable("/opt/yui/yuicompressor-2.4.8.jar")
//!     .build()?;
//!
//! let report = Pipeline::new(config).run()?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod cli;
pub mod config;
mod configuration;
pub mod constants;
pub mod discovery;
mod errors;
pub mod file_ops;
pub mod logging;
pub mod path_gen;
mod utils;
pub mod workflow;

pub use configuration::{configurations_from_arguments, perform_runs_based_on_arguments};
pub use errors::*;

pub mod prelude {
    pub use crate::activity::{ActivityLog, ErrorRecord};
    pub use crate::config::{AssetType, Config, ConfigBuilder, ToolConfig};
    pub use crate::errors::{
        config_parsing_error, directory_not_found_error, file_operation_error, generic_error,
        invalid_config_error, invalid_filename_error, tool_invocation_error, traversal_error,
    };
    pub use crate::errors::{Error, Result};
    pub use crate::logging::{LogLevel, format_message, init_logger};
    pub use crate::path_gen::{PathVersioner, version_path};
    pub use crate::perform_runs_based_on_arguments;
    pub use crate::workflow::{Pipeline, RunReport, RunStats, RunStatus};
}
