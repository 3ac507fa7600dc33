//! Configuration loading functionality
//!
//! A config file lists one or more jobs that share tool and output settings,
//! typically a style sheet job and a script job for the same release:
//!
//! ```yaml
//! version: 1112v4
//! show_activity: true
//! tool:
//!   executable: ~/yui/yuicompressor-2.4.8.jar
//!   prefix: [java, -jar]
//! jobs:
//!   - source: ~/site/public/css
//!     type: css
//!   - source: ~/site/public/js/custom
//!     type: js
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::{debug, info};
use serde::{Deserialize, Deserializer};
use serde_yaml::from_str;
use shellexpand::tilde;

use crate::config::model::{AssetType, Config};
use crate::utils::find_project_folder;

/// Tool settings as written in the config file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ToolSection {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_optional_expanded_path")]
    pub executable: Option<PathBuf>,
    pub prefix: Option<Vec<String>>,
}

/// One job of the config file
#[derive(Deserialize, Debug, Clone)]
pub struct JobSection {
    #[serde(deserialize_with = "deserialize_expanded_path")]
    pub source: PathBuf,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_optional_expanded_path")]
    pub destination: Option<PathBuf>,
    pub segment: Option<String>,
    pub version: Option<String>,
}

/// The config file as a whole
#[derive(Deserialize, Debug, Clone)]
pub struct FileConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub tool: ToolSection,
    pub charset: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_octal_mode")]
    pub mode: Option<u32>,
    #[serde(default)]
    pub show_activity: bool,
    #[serde(default)]
    pub parallel: bool,
    pub pass_through: Option<Vec<String>>,
    pub excluded: Option<Vec<String>>,
    pub jobs: Vec<JobSection>,
}

impl FileConfig {
    /// Turns every job into a validated [`Config`]
    ///
    /// # Errors
    /// Returns an error naming the job if it has no version or fails validation
    pub fn into_configs(self) -> Result<Vec<Config>> {
        if self.jobs.is_empty() {
            return Err(anyhow!(
                "No jobs specified in configuration. At least one job is required."
            ));
        }

        self.jobs
            .iter()
            .enumerate()
            .map(|(index, job)| {
                let version = job
                    .version
                    .as_deref()
                    .or(self.version.as_deref())
                    .ok_or_else(|| {
                        anyhow!(
                            "Job {} ({}) has no version and no top level version is set",
                            index,
                            job.source.display()
                        )
                    })?;

                let mut builder = Config::builder(&job.source, version, job.asset_type)
                    .show_activity(self.show_activity)
                    .parallel(self.parallel);

                if let Some(destination) = &job.destination {
                    builder = builder.destination(destination);
                }
                if let Some(segment) = &job.segment {
                    builder = builder.versioned_segment(segment);
                }
                if let Some(executable) = &self.tool.executable {
                    builder = builder.tool_executable(executable);
                }
                if let Some(prefix) = &self.tool.prefix {
                    builder = builder.tool_prefix(prefix.clone());
                }
                if let Some(charset) = &self.charset {
                    builder = builder.charset(charset);
                }
                if let Some(mode) = self.mode {
                    builder = builder.folder_mode(mode);
                }
                if let Some(pass_through) = &self.pass_through {
                    builder = builder.pass_through(pass_through.clone());
                }
                if let Some(excluded) = &self.excluded {
                    builder = builder.excluded(excluded.clone());
                }

                builder
                    .build()
                    .map_err(|e| anyhow!("Job {} ({}): {}", index, job.source.display(), e))
            })
            .collect()
    }
}

/// Loads the jobs of a configuration file
///
/// # Arguments
/// * `file` - Path to the configuration file
///
/// # Returns
/// * `Result<Vec<Config>>` - One validated configuration per job
///
/// # Errors
/// Returns an error if the file cannot be read or if the configuration is invalid
pub fn load_config(file: &Path) -> Result<Vec<Config>> {
    let file_content = fs::read(file).map_err(|e| {
        anyhow!(
            "Failed to read configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    let content_str = String::from_utf8(file_content).map_err(|e| {
        anyhow!(
            "Configuration file {} contains invalid UTF-8 characters: {}",
            file.display(),
            e
        )
    })?;

    let configs = parse_config(&content_str).map_err(|e| {
        anyhow!(
            "Failed to load configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    info!(
        "Loaded {} job(s) from {}",
        configs.len(),
        file.display()
    );
    Ok(configs)
}

/// Parses the jobs of a configuration held in memory
///
/// # Errors
/// Returns an error if the YAML is malformed or a job is invalid
pub fn parse_config(content: &str) -> Result<Vec<Config>> {
    let file_config: FileConfig = from_str(content)
        .map_err(|e| anyhow!("{}\nPlease check the YAML syntax.", e))?;
    debug!("Parsed configuration with {} job(s)", file_config.jobs.len());

    file_config.into_configs()
}

/// Resolves the configuration file path
///
/// A path that does not exist is looked up in the platform configuration
/// directory instead.
///
/// # Errors
/// Returns an error if the configuration directory cannot be determined
pub fn read_or_create(config: PathBuf) -> Result<PathBuf> {
    if config.exists() {
        Ok(config)
    } else {
        let folder = find_project_folder()?;
        Ok(folder.config_dir().join(config))
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(tilde(path).to_string())
}

fn deserialize_expanded_path<'de, D>(deserializer: D) -> std::result::Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(expand_path(&raw))
}

fn deserialize_optional_expanded_path<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|path| expand_path(&path)))
}

/// Accepts `0755`, `"0o755"` or `"755"`, always read as octal
fn deserialize_octal_mode<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMode {
        Number(u64),
        Text(String),
    }

    match Option::<RawMode>::deserialize(deserializer)? {
        None => Ok(None),
        // YAML reads 0755 as the decimal 755, the digits are what the user meant
        Some(RawMode::Number(number)) => parse_octal_mode(&number.to_string())
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(RawMode::Text(text)) => parse_octal_mode(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Parses an octal permission mode such as `755`, `0755` or `0o755`
///
/// # Errors
/// Returns an error if the value is not an octal number
pub fn parse_octal_mode(value: &str) -> std::result::Result<u32, String> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    u32::from_str_radix(digits, 8).map_err(|e| format!("Invalid octal mode '{value}': {e}"))
}
