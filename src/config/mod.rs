//! Configuration module
//!
//! This module contains the validated run configuration and the config file loader.

mod loader;
mod model;

pub use loader::{
    FileConfig, JobSection, ToolSection, expand_path, load_config, parse_config,
    parse_octal_mode, read_or_create,
};
pub use model::{AssetType, Config, ConfigBuilder, ToolConfig};
