//! Activity log
//!
//! Collects the narration of a run and the errors met along the way. Progress
//! is either echoed straight away through the logger or buffered for the
//! caller, errors are always kept until the report is built.

use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::errors::{Error, Result, generic_error};

/// One recorded error, optionally tagged with the operation that raised it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub operation: Option<String>,
    pub message: String,
}

/// Progress narration and error records of a single run
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    show_activity: bool,
    activity: String,
    errors: Vec<ErrorRecord>,
    warnings: usize,
}

impl ActivityLog {
    /// Creates an empty log
    ///
    /// # Arguments
    /// * `show_activity` - Emit progress immediately instead of buffering it
    pub fn new(show_activity: bool) -> Self {
        ActivityLog {
            show_activity,
            ..Default::default()
        }
    }

    /// Records a progress message
    pub fn progress(&mut self, message: &str) {
        if self.show_activity {
            info!("{message}");
        } else {
            self.activity.push_str(message);
            self.activity.push('\n');
        }
    }

    /// Records an error
    ///
    /// Errors tagged with an operation replace the previous error of that
    /// operation in place, untagged errors are appended. Every call counts as
    /// a warning, whether or not it replaced an earlier entry.
    pub fn error(&mut self, message: &str, operation: Option<&str>) {
        debug!("{}: {}", operation.unwrap_or("error"), message);
        self.warnings += 1;

        let record = ErrorRecord {
            operation: operation.map(str::to_string),
            message: message.to_string(),
        };

        match operation {
            Some(key) => {
                match self
                    .errors
                    .iter_mut()
                    .find(|existing| existing.operation.as_deref() == Some(key))
                {
                    Some(existing) => *existing = record,
                    None => self.errors.push(record),
                }
            }
            None => self.errors.push(record),
        }
    }

    /// Buffered progress, empty when activity is shown immediately
    pub fn output_activity(&self) -> &str {
        &self.activity
    }

    /// The error records as they are stored
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Number of errors recorded, including ones replaced by a later error
    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors in a readable format for the command line
    pub fn formatted_errors(&self) -> String {
        if self.errors.is_empty() {
            return "** No errors were logged **".to_string();
        }

        let mut display = String::from("*** ERRORS ***\n");
        for record in &self.errors {
            if let Some(operation) = &record.operation {
                display.push_str(&format!("Operation: {operation}\n"));
            }
            display.push_str(&record.message);
            display.push('\n');
        }
        display
    }

    /// Raw dump of the error records as YAML
    ///
    /// # Errors
    /// Returns an error if the records cannot be serialised
    pub fn error_dump(&self) -> Result<String> {
        serde_yaml::to_string(&self.errors)
            .map_err(dump_error)
    }
}

fn dump_error(error: serde_yaml::Error) -> Error {
    generic_error(&format!("Failed to serialise the error log: {error}"))
}

impl fmt::Display for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.activity, self.formatted_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_buffered_when_not_shown() {
        let mut log = ActivityLog::new(false);
        log.progress("Creating directory: /a");
        log.progress("Copied file: /a/b.json");

        assert_eq!(
            log.output_activity(),
            "Creating directory: /a\nCopied file: /a/b.json\n"
        );
    }

    #[test]
    fn test_progress_is_not_buffered_when_shown() {
        let mut log = ActivityLog::new(true);
        log.progress("Creating directory: /a");

        assert!(log.output_activity().is_empty());
    }

    #[test]
    fn test_keyed_errors_overwrite_in_place() {
        let mut log = ActivityLog::new(false);
        log.error("first minify failure", Some("minify"));
        log.error("untagged", None);
        log.error("second minify failure", Some("minify"));

        let errors = log.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "second minify failure");
        assert_eq!(errors[0].operation.as_deref(), Some("minify"));
        assert_eq!(errors[1].message, "untagged");
        assert_eq!(log.warning_count(), 3);
    }

    #[test]
    fn test_unkeyed_errors_append() {
        let mut log = ActivityLog::new(false);
        log.error("one", None);
        log.error("one", None);

        assert_eq!(log.errors().len(), 2);
    }

    #[test]
    fn test_formatted_errors() {
        let mut log = ActivityLog::new(false);
        assert_eq!(log.formatted_errors(), "** No errors were logged **");

        log.error("boom - For file: /x/v1/a.css", Some("minify"));
        log.error("plain", None);
        assert_eq!(
            log.formatted_errors(),
            "*** ERRORS ***\nOperation: minify\nboom - For file: /x/v1/a.css\nplain\n"
        );
    }

    #[test]
    fn test_error_dump_is_yaml() {
        let mut log = ActivityLog::new(false);
        log.error("boom", Some("copy"));

        let dump = log.error_dump().unwrap();
        assert!(dump.contains("operation: copy"));
        assert!(dump.contains("message: boom"));
    }

    #[test]
    fn test_dump_failure_is_a_generic_error() {
        let yaml_error = serde_yaml::from_str::<u32>("not a number").unwrap_err();

        let error = dump_error(yaml_error);
        assert!(matches!(error, Error::Generic { .. }));
        assert!(error.to_string().starts_with("Failed to serialise the error log:"));
    }

    #[test]
    fn test_display_combines_progress_and_errors() {
        let mut log = ActivityLog::new(false);
        log.progress("Have minified a total of: 0 css files.");

        assert_eq!(
            log.to_string(),
            "Have minified a total of: 0 css files.\n** No errors were logged **"
        );
    }
}
