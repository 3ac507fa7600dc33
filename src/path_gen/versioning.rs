//! Version segment insertion
//!
//! Turns a path from the scanned tree into the path it gets under the
//! versioned destination. The rewrite is purely textual: the first
//! occurrence of the configured segment gets the version appended to it and
//! nothing else about the path is touched.

use std::path::{Path, PathBuf};

use log::trace;

use crate::errors::{Result, invalid_filename_error};

/// Inserts `version` right after the first occurrence of `segment` in `path`
///
/// A segment ending in `/` becomes `segment + version + "/"`, any other
/// segment becomes `segment + "/" + version`. Paths that do not contain the
/// segment are returned unchanged, and a second application inserts the
/// version a second time.
///
/// # Examples
/// ```
/// use versioned_minify::path_gen::version_path;
///
/// let path = version_path("/site/public/css/main.css", "/public/css/", "v2");
/// assert_eq!(path, "/site/public/css/v2/main.css");
///
/// let untouched = version_path("/site/other/main.css", "/public/css/", "v2");
/// assert_eq!(untouched, "/site/other/main.css");
/// ```
pub fn version_path(path: &str, segment: &str, version: &str) -> String {
    if segment.is_empty() || !path.contains(segment) {
        return path.to_string();
    }

    let replacement = if segment.ends_with('/') {
        format!("{segment}{version}/")
    } else {
        format!("{segment}/{version}")
    };

    path.replacen(segment, &replacement, 1)
}

/// Path flavoured wrapper around [`version_path`]
///
/// # Errors
/// Returns an error if the path is not valid Unicode
pub fn version_pathbuf(path: &Path, segment: &str, version: &str) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| invalid_filename_error(path.to_path_buf()))?;

    Ok(PathBuf::from(version_path(path_str, segment, version)))
}

/// Whether the textual rewrite would change `path`
pub fn contains_segment(path: &str, segment: &str) -> bool {
    !segment.is_empty() && path.contains(segment)
}

/// Result of mapping one scanned path to the versioned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedPath {
    /// The segment was found and the version inserted
    Versioned(PathBuf),
    /// The segment was missing, the path is returned as is
    Unmatched(PathBuf),
}

impl MappedPath {
    /// The resulting path, versioned or not
    pub fn path(&self) -> &Path {
        match self {
            MappedPath::Versioned(path) | MappedPath::Unmatched(path) => path,
        }
    }

    pub fn is_versioned(&self) -> bool {
        matches!(self, MappedPath::Versioned(_))
    }
}

/// Maps scanned source paths onto the versioned destination tree
///
/// When a destination root is set the source root prefix is swapped for it
/// before the version is inserted, otherwise the versioned tree lives next
/// to the originals inside the source tree.
#[derive(Debug, Clone)]
pub struct PathVersioner {
    segment: String,
    version: String,
    source_root: PathBuf,
    destination_root: Option<PathBuf>,
}

impl PathVersioner {
    pub fn new(
        segment: &str,
        version: &str,
        source_root: &Path,
        destination_root: Option<&Path>,
    ) -> Self {
        PathVersioner {
            segment: segment.to_string(),
            version: version.to_string(),
            source_root: source_root.to_path_buf(),
            destination_root: destination_root.map(Path::to_path_buf),
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Root the versioned tree is written under, before versioning
    pub fn base_root(&self) -> &Path {
        self.destination_root.as_deref().unwrap_or(&self.source_root)
    }

    /// The versioned form of the base root, e.g. `.../public/css/v2`
    ///
    /// # Errors
    /// Returns an error if the root is not valid Unicode
    pub fn version_root(&self) -> Result<MappedPath> {
        let root = self.base_root();
        let root_str = root
            .to_str()
            .ok_or_else(|| invalid_filename_error(root.to_path_buf()))?;
        let with_slash = with_trailing_slash(root_str);

        if !contains_segment(&with_slash, &self.segment) {
            return Ok(MappedPath::Unmatched(root.to_path_buf()));
        }

        let versioned = version_path(&with_slash, &self.segment, &self.version);
        Ok(MappedPath::Versioned(PathBuf::from(
            versioned.trim_end_matches('/'),
        )))
    }

    /// Map one scanned path onto the versioned tree
    ///
    /// # Errors
    /// Returns an error if the path is not valid Unicode
    pub fn map(&self, path: &Path) -> Result<MappedPath> {
        let rebased = match (&self.destination_root, path.strip_prefix(&self.source_root)) {
            (Some(destination), Ok(relative)) => destination.join(relative),
            _ => path.to_path_buf(),
        };

        let rebased_str = rebased
            .to_str()
            .ok_or_else(|| invalid_filename_error(rebased.clone()))?;

        if !contains_segment(rebased_str, &self.segment) {
            trace!("No segment {} in {}", self.segment, rebased_str);
            return Ok(MappedPath::Unmatched(rebased));
        }

        Ok(MappedPath::Versioned(PathBuf::from(version_path(
            rebased_str,
            &self.segment,
            &self.version,
        ))))
    }
}

pub(crate) fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
