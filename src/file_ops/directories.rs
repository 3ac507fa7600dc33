//! Directory materialisation
//!
//! Recreates the scanned folder structure under the version root. Folders
//! that already exist are left alone and a folder that cannot be created is
//! logged without stopping the others.

use std::fs::DirBuilder;
use std::path::{Path, PathBuf};

use log::debug;

use crate::activity::ActivityLog;
use crate::constants::OP_CREATE_DIRECTORIES;
use crate::errors::{Result, file_operation_error};

/// Creates the version root and every versioned directory
///
/// # Arguments
/// * `version_root` - The top level versioned folder, created with any missing ancestors
/// * `directories` - Versioned directories, parents before children
/// * `mode` - Permission bits for new folders, ignored off Unix
/// * `log` - Receives one progress line per folder created and the failures
///
/// # Returns
/// * `usize` - The number of folders created by this call
pub fn materialize_directories(
    version_root: &Path,
    directories: &[PathBuf],
    mode: u32,
    log: &mut ActivityLog,
) -> usize {
    let mut created = 0;

    if !version_root.is_dir() {
        match create_directory(version_root, mode, true) {
            Ok(()) => {
                log.progress(&format!("Creating directory: {}", version_root.display()));
                created += 1;
            }
            Err(e) => log.error(&e.to_string(), Some(OP_CREATE_DIRECTORIES)),
        }
    }

    for folder in directories {
        if folder.is_dir() {
            debug!("Directory exists: {}", folder.display());
            continue;
        }

        match create_directory(folder, mode, false) {
            Ok(()) => {
                log.progress(&format!("Creating directory: {}", folder.display()));
                created += 1;
            }
            Err(e) => log.error(&e.to_string(), Some(OP_CREATE_DIRECTORIES)),
        }
    }

    created
}

fn create_directory(path: &Path, mode: u32, recursive: bool) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(recursive);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(path)
        .map_err(|e| file_operation_error(e, path.to_path_buf(), "create directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_root_and_children() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("css/v1");
        let directories = vec![root.join("a"), root.join("a/b")];
        let mut log = ActivityLog::new(false);

        let created = materialize_directories(&root, &directories, 0o755, &mut log);

        assert_eq!(created, 3);
        assert!(root.join("a/b").is_dir());
        assert!(!log.has_errors());
        assert!(log.output_activity().contains("Creating directory:"));
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("v1");
        // Parent missing, non-recursive creation fails
        let directories = vec![root.join("missing/child"), root.join("sibling")];
        let mut log = ActivityLog::new(false);

        let created = materialize_directories(&root, &directories, 0o755, &mut log);

        assert_eq!(created, 2);
        assert!(root.join("sibling").is_dir());
        assert_eq!(log.errors().len(), 1);
        assert_eq!(
            log.errors()[0].operation.as_deref(),
            Some(OP_CREATE_DIRECTORIES)
        );
    }
}
