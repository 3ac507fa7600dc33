//! File discovery module
//!
//! This module contains the scanner that maps the source tree.

mod scanner;

pub use scanner::{ScanResult, scan_tree};
