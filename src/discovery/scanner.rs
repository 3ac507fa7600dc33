//! Directory scanning functionality
//!
//! This module walks the source tree and splits it into the directories to
//! recreate and the files to process.

use std::path::{Path, PathBuf};

use log::{debug, trace};
use walkdir::WalkDir;

use crate::errors::{Result, directory_not_found_error, traversal_error};

/// Everything found below the source root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Directories, parents before children
    pub directories: Vec<PathBuf>,
    /// Regular files in traversal order
    pub files: Vec<PathBuf>,
    /// Symbolic links that were left out
    pub skipped: Vec<PathBuf>,
}

/// Scans a directory tree
///
/// The walk is pre-order, so every directory is listed before its contents
/// and the list can be created front to back. Excluded folders and the skip
/// path are pruned before they are read, an unreadable folder inside them
/// never fails the scan. Entries are sorted by name within a directory so
/// two scans of the same tree give the same lists.
///
/// # Arguments
/// * `root` - The directory to scan, not included in the result
/// * `excluded` - Folder names whose whole subtree is left out, e.g. `.svn`
/// * `skip` - A path left out with its subtree, used for a version root
///   placed inside the source tree
///
/// # Returns
/// * `Result<ScanResult>` - The directories and files found
///
/// # Errors
/// * Returns an error if the root is not a directory
/// * Returns an error if any entry cannot be read, the scan is not partial
pub fn scan_tree(root: &Path, excluded: &[String], skip: Option<&Path>) -> Result<ScanResult> {
    debug!("Scanning directory: {}", root.display());

    if !root.is_dir() {
        return Err(directory_not_found_error(root.to_path_buf()));
    }

    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let path = entry.path();
            let keep = !is_excluded(root, path, excluded)
                && !skip.is_some_and(|s| path.starts_with(s));
            if !keep {
                trace!("Excluded: {}", path.display());
            }
            keep
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            traversal_error(e, path)
        })?;
        let path = entry.path();

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            result.skipped.push(path.to_path_buf());
        } else if file_type.is_dir() {
            result.directories.push(path.to_path_buf());
        } else {
            result.files.push(path.to_path_buf());
        }
    }

    debug!(
        "Found {} directories and {} files",
        result.directories.len(),
        result.files.len()
    );

    Ok(result)
}

/// Whether any folder between the root and the path is an exclusion marker
fn is_excluded(root: &Path, path: &Path, excluded: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        let name = component.as_os_str();
        excluded.iter().any(|marker| name == marker.as_str())
    })
}
