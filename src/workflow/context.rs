//! Run report
//!
//! This module defines what a finished run hands back to its caller.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::activity::ActivityLog;
use crate::file_ops::FileMapping;

/// How a run that did not fail outright went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing was logged as an error
    Succeeded,
    /// The run finished but this many errors were logged on the way
    SucceededWithWarnings(usize),
}

/// Statistics about the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of directories created, the version root included
    pub directories_created: usize,
    /// Number of asset files handed to the minifier
    pub files_minified: usize,
    /// Number of pass-through files copied
    pub files_copied: usize,
    /// Number of files of other types
    pub files_ignored: usize,
    /// Number of minifier runs or copies that reported a problem
    pub files_failed: usize,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub stats: RunStats,
    /// The versioned folder everything was written under
    pub version_root: PathBuf,
    /// Versioned directories, parents before children
    pub directories: Vec<PathBuf>,
    /// Original files paired with their versioned paths
    pub files: Vec<FileMapping>,
    pub log: ActivityLog,
}

impl RunReport {
    /// Original file paths, aligned with [`RunReport::versioned_files`]
    pub fn original_files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|mapping| mapping.source.as_path())
    }

    /// Versioned file paths, aligned with [`RunReport::original_files`]
    pub fn versioned_files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|mapping| mapping.destination.as_path())
    }

    pub fn is_clean(&self) -> bool {
        self.status == RunStatus::Succeeded
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log)
    }
}
