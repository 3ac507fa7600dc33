//! Path generation module
//!
//! This module contains the rewrite from source paths to versioned destination paths.

mod versioning;

pub use versioning::{
    MappedPath, PathVersioner, contains_segment, version_path, version_pathbuf,
};
pub(crate) use versioning::with_trailing_slash;
