//! File transformation
//!
//! Sends every asset file through the minifier, copies pass-through files as
//! they are and ignores the rest. A failing file is logged and the run moves
//! on to the next one.

use std::path::{Path, PathBuf};

use fs_extra::file::{CopyOptions, copy};
use log::debug;
use rayon::prelude::*;

use crate::activity::ActivityLog;
use crate::config::Config;
use crate::constants::{OP_COPY, OP_MINIFY};
use crate::errors::file_operation_error;
use crate::file_ops::tool::run_tool;

/// An original file and where it goes in the versioned tree
///
/// Keeping both paths in one value keeps the original list and the
/// destination list aligned for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    /// Position of the file in the scan
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// What a file gets turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Minified through the external tool
    Asset,
    /// Copied byte for byte
    PassThrough,
    /// Left out of the versioned tree
    Other,
}

/// Works out the kind of a file from its extension, ignoring case
///
/// Only the extension after the last dot counts. A name that merely ends in
/// the asset extension, such as `theme.scss` for `css`, is not an asset.
pub fn classify(path: &Path, asset_extension: &str, pass_through: &[String]) -> FileKind {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return FileKind::Other;
    };

    if extension.eq_ignore_ascii_case(asset_extension) {
        FileKind::Asset
    } else if pass_through
        .iter()
        .any(|candidate| extension.eq_ignore_ascii_case(candidate))
    {
        FileKind::PassThrough
    } else {
        FileKind::Other
    }
}

/// Counters of the transform stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Asset files handed to the minifier, reported or not
    pub minified: usize,
    /// Pass-through files copied
    pub copied: usize,
    /// Files of any other type
    pub ignored: usize,
    /// Minifier runs and copies that reported a problem
    pub failed: usize,
}

#[derive(Debug, Clone)]
enum FileOutcome {
    Minified {
        destination: PathBuf,
        problem: Option<String>,
    },
    Copied {
        destination: PathBuf,
        problem: Option<String>,
    },
    Ignored,
}

/// Minifies or copies every mapped file
///
/// Files are handled in mapping order. With `parallel` set the work runs on
/// the rayon pool and the outcomes are logged in mapping order once all of
/// them are in.
///
/// # Arguments
/// * `mappings` - Original files and their versioned destinations
/// * `config` - The run configuration
/// * `log` - Receives progress, failures and the closing summary
///
/// # Returns
/// * `TransformStats` - Counts per outcome
pub fn transform_files(
    mappings: &[FileMapping],
    config: &Config,
    log: &mut ActivityLog,
) -> TransformStats {
    let mut stats = TransformStats::default();

    if config.parallel() {
        let mut outcomes: Vec<(usize, FileOutcome)> = mappings
            .par_iter()
            .map(|mapping| (mapping.index, process_file(mapping, config)))
            .collect();
        outcomes.sort_by_key(|(index, _)| *index);

        for (_, outcome) in outcomes {
            record_outcome(outcome, &mut stats, log);
        }
    } else {
        for mapping in mappings {
            let outcome = process_file(mapping, config);
            record_outcome(outcome, &mut stats, log);
        }
    }

    log.progress(&format!(
        "Have minified a total of: {} {} files.",
        stats.minified,
        config.asset_type().extension()
    ));

    stats
}

fn process_file(mapping: &FileMapping, config: &Config) -> FileOutcome {
    let kind = classify(
        &mapping.source,
        config.asset_type().extension(),
        config.pass_through(),
    );

    match kind {
        FileKind::Asset => {
            let problem = match run_tool(
                config.tool(),
                &mapping.source,
                &mapping.destination,
                &config.charset_option(),
            ) {
                Ok(run) => run.problem(),
                Err(e) => Some(e.to_string()),
            };
            FileOutcome::Minified {
                destination: mapping.destination.clone(),
                problem,
            }
        }
        FileKind::PassThrough => {
            let options = CopyOptions::new().overwrite(true);
            let problem = copy(&mapping.source, &mapping.destination, &options)
                .map_err(|e| {
                    file_operation_error(
                        std::io::Error::other(e),
                        mapping.source.clone(),
                        "copy",
                    )
                })
                .err()
                .map(|e| e.to_string());
            FileOutcome::Copied {
                destination: mapping.destination.clone(),
                problem,
            }
        }
        FileKind::Other => {
            debug!("Ignoring file: {}", mapping.source.display());
            FileOutcome::Ignored
        }
    }
}

fn record_outcome(outcome: FileOutcome, stats: &mut TransformStats, log: &mut ActivityLog) {
    match outcome {
        FileOutcome::Minified {
            destination,
            problem,
        } => {
            log.progress(&format!("Minified file: {}", destination.display()));
            if let Some(problem) = problem {
                log.error(
                    &format!("{} - For file: {}", problem, destination.display()),
                    Some(OP_MINIFY),
                );
                stats.failed += 1;
            }
            stats.minified += 1;
        }
        FileOutcome::Copied {
            destination,
            problem: None,
        } => {
            log.progress(&format!("Copied file: {}", destination.display()));
            stats.copied += 1;
        }
        FileOutcome::Copied {
            destination,
            problem: Some(problem),
        } => {
            log.error(
                &format!("{} - For file: {}", problem, destination.display()),
                Some(OP_COPY),
            );
            stats.failed += 1;
        }
        FileOutcome::Ignored => stats.ignored += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let pass_through = vec!["json".to_string()];

        assert_eq!(classify(Path::new("a/site.css"), "css", &pass_through), FileKind::Asset);
        assert_eq!(classify(Path::new("a/SITE.CSS"), "css", &pass_through), FileKind::Asset);
        assert_eq!(classify(Path::new("a/data.json"), "css", &pass_through), FileKind::PassThrough);
        assert_eq!(classify(Path::new("a/theme.scss"), "css", &pass_through), FileKind::Other);
        assert_eq!(classify(Path::new("a/README"), "css", &pass_through), FileKind::Other);
        assert_eq!(classify(Path::new("a/app.js"), "css", &pass_through), FileKind::Other);
    }
}
