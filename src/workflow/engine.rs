//! Pipeline engine
//!
//! This module runs the stages of a versioned copy one after the other.

use std::path::PathBuf;

use log::{debug, info};

use crate::activity::ActivityLog;
use crate::config::Config;
use crate::constants::OP_VERSION_PATHS;
use crate::discovery::scan_tree;
use crate::errors::{Result, invalid_config_error};
use crate::file_ops::{FileMapping, materialize_directories, transform_files};
use crate::path_gen::{MappedPath, PathVersioner};

use super::context::{RunReport, RunStats, RunStatus};

/// Copies one asset tree into its versioned folder
///
/// The pipeline owns an immutable [`Config`]. Every call to
/// [`Pipeline::run`] starts from a fresh scan and a fresh log, so running the
/// same pipeline twice gives two independent reports.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the pipeline
    ///
    /// 1. Scan the source tree
    /// 2. Version the directory list
    /// 3. Create the versioned directories
    /// 4. Version the file list
    /// 5. Minify asset files and copy pass-through files
    ///
    /// Problems with single directories or files are logged and the run
    /// carries on, they show up in the report and its status.
    ///
    /// # Returns
    /// * `Result<RunReport>` - The report of the run
    ///
    /// # Errors
    /// * Returns an error if the source root cannot be scanned
    /// * Returns an error if the root the versioned tree goes under does not
    ///   contain the versioned segment
    pub fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        let mut log = ActivityLog::new(config.show_activity());

        let versioner = PathVersioner::new(
            config.versioned_segment(),
            config.version(),
            config.source(),
            config.destination(),
        );

        let version_root = match versioner.version_root()? {
            MappedPath::Versioned(root) => root,
            MappedPath::Unmatched(root) => {
                return Err(invalid_config_error(
                    "segment",
                    &format!(
                        "'{}' does not occur in {}",
                        config.versioned_segment(),
                        root.display()
                    ),
                ));
            }
        };

        info!(
            "Versioning {} files from {} into {}",
            config.asset_type(),
            config.source().display(),
            version_root.display()
        );

        // An output folder inside the source tree must not be copied into itself
        let skip = version_root
            .starts_with(config.source())
            .then_some(version_root.as_path());

        // Step 1: Scan the source tree
        let scan = scan_tree(config.source(), config.excluded(), skip)?;
        for link in &scan.skipped {
            log.progress(&format!("Skipping symbolic link: {}", link.display()));
        }

        // Step 2: Version the directory list
        let directories = version_directories(&versioner, &scan.directories, &mut log);

        // Step 3: Create the directories
        let directories_created =
            materialize_directories(&version_root, &directories, config.folder_mode(), &mut log);

        // Step 4: Version the file list
        let files = version_files(&versioner, &scan.files, &mut log);
        debug!("Mapped {} of {} files", files.len(), scan.files.len());

        // Step 5: Minify and copy
        let transform = transform_files(&files, config, &mut log);

        let status = match log.warning_count() {
            0 => RunStatus::Succeeded,
            warnings => RunStatus::SucceededWithWarnings(warnings),
        };

        info!(
            "Finished {} run: {} minified, {} copied, {} warning(s)",
            config.asset_type(),
            transform.minified,
            transform.copied,
            log.warning_count()
        );

        Ok(RunReport {
            status,
            stats: RunStats {
                directories_created,
                files_minified: transform.minified,
                files_copied: transform.copied,
                files_ignored: transform.ignored,
                files_failed: transform.failed,
            },
            version_root,
            directories,
            files,
            log,
        })
    }
}

/// Versioned form of every scanned directory
///
/// A directory whose path cannot be versioned is logged under
/// `version_paths` and left out, the rest of the run goes on without it.
fn version_directories(
    versioner: &PathVersioner,
    scanned: &[PathBuf],
    log: &mut ActivityLog,
) -> Vec<PathBuf> {
    let mut directories = Vec::with_capacity(scanned.len());
    for directory in scanned {
        match versioner.map(directory) {
            Ok(MappedPath::Versioned(path)) => directories.push(path),
            Ok(MappedPath::Unmatched(path)) => log.error(
                &format!(
                    "'{}' does not occur in {}, directory not created",
                    versioner.segment(),
                    path.display()
                ),
                Some(OP_VERSION_PATHS),
            ),
            Err(e) => log.error(
                &format!("{e}, directory not created"),
                Some(OP_VERSION_PATHS),
            ),
        }
    }
    directories
}

/// Pairs every scanned file with its versioned destination
///
/// Files that cannot be versioned are logged under `version_paths` and not
/// written. The scan index is kept so the pairs stay in scan order.
fn version_files(
    versioner: &PathVersioner,
    scanned: &[PathBuf],
    log: &mut ActivityLog,
) -> Vec<FileMapping> {
    let mut files = Vec::with_capacity(scanned.len());
    for (index, source) in scanned.iter().enumerate() {
        match versioner.map(source) {
            Ok(MappedPath::Versioned(destination)) => files.push(FileMapping {
                index,
                source: source.clone(),
                destination,
            }),
            Ok(MappedPath::Unmatched(path)) => log.error(
                &format!(
                    "'{}' does not occur in {}, file not written",
                    versioner.segment(),
                    path.display()
                ),
                Some(OP_VERSION_PATHS),
            ),
            Err(e) => log.error(&format!("{e}, file not written"), Some(OP_VERSION_PATHS)),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn versioner() -> PathVersioner {
        PathVersioner::new("/public/css/", "v1", Path::new("/www/public/css"), None)
    }

    #[test]
    fn test_versioned_paths_are_kept_in_order() {
        let mut log = ActivityLog::new(false);
        let scanned = vec![
            PathBuf::from("/www/public/css/a.css"),
            PathBuf::from("/www/public/css/b/c.css"),
        ];

        let files = version_files(&versioner(), &scanned, &mut log);

        assert_eq!(files.len(), 2);
        assert_eq!(files[1].index, 1);
        assert_eq!(files[1].destination, PathBuf::from("/www/public/css/v1/b/c.css"));
        assert!(!log.has_errors());
    }

    #[test]
    fn test_unmatched_directory_is_logged_and_left_out() {
        let mut log = ActivityLog::new(false);
        let scanned = vec![
            PathBuf::from("/www/public/css/theme"),
            PathBuf::from("/www/static/theme"),
        ];

        let directories = version_directories(&versioner(), &scanned, &mut log);

        assert_eq!(directories, vec![PathBuf::from("/www/public/css/v1/theme")]);
        assert_eq!(log.errors().len(), 1);
        assert_eq!(log.errors()[0].operation.as_deref(), Some(OP_VERSION_PATHS));
        assert_eq!(
            log.errors()[0].message,
            "'/public/css/' does not occur in /www/static/theme, directory not created"
        );
    }

    #[test]
    fn test_unmatched_file_is_logged_and_not_paired() {
        let mut log = ActivityLog::new(false);
        let scanned = vec![
            PathBuf::from("/www/static/a.css"),
            PathBuf::from("/www/public/css/b.css"),
        ];

        let files = version_files(&versioner(), &scanned, &mut log);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].index, 1);
        assert_eq!(log.warning_count(), 1);
        assert!(log.errors()[0].message.ends_with("file not written"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_file_name_is_logged_not_fatal() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut log = ActivityLog::new(false);
        let odd = Path::new("/www/public/css").join(OsStr::from_bytes(b"caf\xE9.txt"));
        let scanned = vec![odd, PathBuf::from("/www/public/css/a.css")];

        let files = version_files(&versioner(), &scanned, &mut log);

        assert_eq!(files.len(), 1);
        assert_eq!(log.errors().len(), 1);
        assert_eq!(log.errors()[0].operation.as_deref(), Some(OP_VERSION_PATHS));
        assert!(log.errors()[0].message.contains("not valid unicode"));
    }
}
