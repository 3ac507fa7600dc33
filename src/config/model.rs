//! Configuration data structures
//!
//! A [`Config`] describes one run of the pipeline. It is only built through
//! [`ConfigBuilder::build`], which validates every value, and is never
//! changed afterwards.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CHARSET, DEFAULT_EXCLUDED, DEFAULT_FOLDER_MODE, DEFAULT_PASS_THROUGH,
    DEFAULT_TOOL_EXECUTABLE, DEFAULT_TOOL_PREFIX, SCRIPT_SEGMENT, STYLE_SEGMENT,
};
use crate::errors::{Result, invalid_config_error};
use crate::path_gen::{contains_segment, with_trailing_slash};

/// The kind of asset minified in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum AssetType {
    /// Style sheets, `.css`
    Style,
    /// Scripts, `.js`
    Script,
}

impl AssetType {
    /// File extension of the asset type, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            AssetType::Style => "css",
            AssetType::Script => "js",
        }
    }

    /// Segment versioned when none is configured
    pub fn default_segment(&self) -> &'static str {
        match self {
            AssetType::Style => STYLE_SEGMENT,
            AssetType::Script => SCRIPT_SEGMENT,
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "css" | "style" => Ok(AssetType::Style),
            "js" | "script" => Ok(AssetType::Script),
            _ => Err(format!("Unknown asset type: {s}")),
        }
    }
}

impl TryFrom<String> for AssetType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How the external minifier is invoked
///
/// The command line is `<prefix...> <executable> <input> -o <output>`, for
/// the YUI compressor that is `java -jar yuicompressor.jar ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub executable: PathBuf,
    pub prefix: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            executable: PathBuf::from(DEFAULT_TOOL_EXECUTABLE),
            prefix: DEFAULT_TOOL_PREFIX.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Validated configuration of a single run
#[derive(Debug, Clone)]
pub struct Config {
    source: PathBuf,
    destination: Option<PathBuf>,
    version: String,
    asset_type: AssetType,
    versioned_segment: String,
    folder_mode: u32,
    charset: String,
    tool: ToolConfig,
    pass_through: Vec<String>,
    excluded: Vec<String>,
    show_activity: bool,
    parallel: bool,
}

impl Config {
    /// Starts a builder with the three values every run needs
    pub fn builder(source: impl Into<PathBuf>, version: &str, asset_type: AssetType) -> ConfigBuilder {
        ConfigBuilder::new(source, version, asset_type)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Base the versioned tree is written under, if not the source itself
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn versioned_segment(&self) -> &str {
        &self.versioned_segment
    }

    pub fn folder_mode(&self) -> u32 {
        self.folder_mode
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// The `--charset` option handed to the tool, empty when disabled
    pub fn charset_option(&self) -> Vec<String> {
        if self.charset.is_empty() {
            Vec::new()
        } else {
            vec!["--charset".to_string(), self.charset.clone()]
        }
    }

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    pub fn pass_through(&self) -> &[String] {
        &self.pass_through
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn show_activity(&self) -> bool {
        self.show_activity
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

/// Builder for [`Config`]
///
/// Every optional value starts at its default, [`ConfigBuilder::build`]
/// checks the combination before handing out a `Config`.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    source: PathBuf,
    destination: Option<PathBuf>,
    version: String,
    asset_type: AssetType,
    versioned_segment: Option<String>,
    folder_mode: u32,
    charset: String,
    tool: ToolConfig,
    pass_through: Vec<String>,
    excluded: Vec<String>,
    show_activity: bool,
    parallel: bool,
}

impl ConfigBuilder {
    pub fn new(source: impl Into<PathBuf>, version: &str, asset_type: AssetType) -> Self {
        ConfigBuilder {
            source: source.into(),
            destination: None,
            version: version.trim().to_string(),
            asset_type,
            versioned_segment: None,
            folder_mode: DEFAULT_FOLDER_MODE,
            charset: DEFAULT_CHARSET.to_string(),
            tool: ToolConfig::default(),
            pass_through: DEFAULT_PASS_THROUGH.iter().map(|s| s.to_string()).collect(),
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            show_activity: false,
            parallel: false,
        }
    }

    /// Writes the versioned tree under another root instead of the source
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Overrides the segment the version is inserted after
    pub fn versioned_segment(mut self, segment: &str) -> Self {
        self.versioned_segment = Some(segment.to_string());
        self
    }

    pub fn folder_mode(mut self, mode: u32) -> Self {
        self.folder_mode = mode;
        self
    }

    /// Character set handed to the tool, an empty string disables the option
    pub fn charset(mut self, charset: &str) -> Self {
        self.charset = charset.trim().to_string();
        self
    }

    pub fn tool_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.tool.executable = executable.into();
        self
    }

    pub fn tool_prefix<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool.prefix = prefix.into_iter().map(Into::into).collect();
        self
    }

    pub fn pass_through<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pass_through = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn excluded<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn show_activity(mut self, show: bool) -> Self {
        self.show_activity = show;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the values and builds the configuration
    ///
    /// # Errors
    /// * Returns an error if the version tag is empty or contains anything
    ///   other than letters, digits, `.`, `_` and `-`
    /// * Returns an error if the versioned segment is empty or does not occur
    ///   in the root the versioned tree is written under
    /// * Returns an error if the charset is not a known encoding label
    /// * Returns an error if the folder mode has bits outside `0o7777`
    /// * Returns an error if the tool executable is empty
    pub fn build(self) -> Result<Config> {
        static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[A-Za-z0-9._-]+$")
                .expect("Failed to compile regex pattern for VERSION_PATTERN")
        });

        if self.version.is_empty() {
            return Err(invalid_config_error("version", "must not be empty"));
        }
        if !VERSION_PATTERN.is_match(&self.version) || self.version == "." || self.version == ".." {
            return Err(invalid_config_error(
                "version",
                &format!(
                    "'{}' may only contain letters, digits, '.', '_' and '-'",
                    self.version
                ),
            ));
        }

        let segment = self
            .versioned_segment
            .unwrap_or_else(|| self.asset_type.default_segment().to_string());
        if segment.trim_matches('/').is_empty() {
            return Err(invalid_config_error("segment", "must name at least one folder"));
        }

        let base = self.destination.as_deref().unwrap_or(&self.source);
        let base_str = base
            .to_str()
            .ok_or_else(|| invalid_config_error("source", "path is not valid unicode"))?;
        if !contains_segment(&with_trailing_slash(base_str), &segment) {
            return Err(invalid_config_error(
                "segment",
                &format!("'{}' does not occur in {}", segment, base.display()),
            ));
        }

        if !self.charset.is_empty() && Encoding::for_label(self.charset.as_bytes()).is_none() {
            return Err(invalid_config_error(
                "charset",
                &format!("unknown encoding '{}'", self.charset),
            ));
        }

        if self.folder_mode > 0o7777 {
            return Err(invalid_config_error(
                "mode",
                &format!("{:o} is not a permission mode", self.folder_mode),
            ));
        }

        if self.tool.executable.as_os_str().is_empty() {
            return Err(invalid_config_error("tool", "executable must not be empty"));
        }

        let pass_through = normalise_extensions(self.pass_through);
        let excluded = self
            .excluded
            .into_iter()
            .filter(|marker| !marker.trim().is_empty())
            .collect();

        Ok(Config {
            source: self.source,
            destination: self.destination,
            version: self.version,
            asset_type: self.asset_type,
            versioned_segment: segment,
            folder_mode: self.folder_mode,
            charset: self.charset,
            tool: self.tool,
            pass_through,
            excluded,
            show_activity: self.show_activity,
            parallel: self.parallel,
        })
    }
}

fn normalise_extensions(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_from_str() {
        assert_eq!("css".parse::<AssetType>().unwrap(), AssetType::Style);
        assert_eq!(" CSS ".parse::<AssetType>().unwrap(), AssetType::Style);
        assert_eq!("style".parse::<AssetType>().unwrap(), AssetType::Style);
        assert_eq!("js".parse::<AssetType>().unwrap(), AssetType::Script);
        assert_eq!("Script".parse::<AssetType>().unwrap(), AssetType::Script);
        assert!("less".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::builder("/www/public/css", "1112v4", AssetType::Style)
            .build()
            .unwrap();

        assert_eq!(config.versioned_segment(), "/public/css/");
        assert_eq!(config.folder_mode(), 0o755);
        assert_eq!(config.charset_option(), vec!["--charset", "utf-8"]);
        assert_eq!(config.tool().prefix, vec!["java", "-jar"]);
        assert_eq!(config.pass_through(), ["json"]);
        assert_eq!(config.excluded(), [".svn", ".git"]);
        assert!(!config.show_activity());
        assert!(!config.parallel());
    }

    #[test]
    fn test_script_default_segment() {
        let config = Config::builder("/www/public/js/custom/", "v1", AssetType::Script)
            .build()
            .unwrap();
        assert_eq!(config.versioned_segment(), "/public/js/custom/");
    }

    #[test]
    fn test_empty_charset_disables_option() {
        let config = Config::builder("/www/public/css", "v1", AssetType::Style)
            .charset("")
            .build()
            .unwrap();
        assert!(config.charset_option().is_empty());
    }

    #[test]
    fn test_pass_through_is_normalised() {
        let config = Config::builder("/www/public/css", "v1", AssetType::Style)
            .pass_through([".JSON", "map", " "])
            .build()
            .unwrap();
        assert_eq!(config.pass_through(), ["json", "map"]);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let base = || Config::builder("/www/public/css", "v1", AssetType::Style);

        assert!(Config::builder("/www/public/css", "  ", AssetType::Style).build().is_err());
        assert!(Config::builder("/www/public/css", "v1/../x", AssetType::Style).build().is_err());
        assert!(base().charset("klingon").build().is_err());
        assert!(base().folder_mode(0o17777).build().is_err());
        assert!(base().versioned_segment("/").build().is_err());
        assert!(base().tool_executable("").build().is_err());
    }

    #[test]
    fn test_segment_must_occur_in_root() {
        let error = Config::builder("/www/static", "v1", AssetType::Style)
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("does not occur"));

        let config = Config::builder("/www/static", "v1", AssetType::Style)
            .destination("/www/public/css")
            .build();
        assert!(config.is_ok());
    }
}
