use std::path::PathBuf;

use crate::error::ParseError;

/// A parsed `KEY=VALUE` entry from an env file or input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub source: Option<PathBuf>,
    pub line: u32,
}

/// Entries of one document in line order, plus the lines that were skipped
/// as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutput {
    pub entries: Vec<Entry>,
    pub errors: Vec<ParseError>,
    /// Blank and comment-only lines.
    pub ignored: usize,
}

/// Summary of the load operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub files_read: usize,
    pub loaded: usize,
    pub skipped_existing: usize,
    pub ignored: usize,
    pub malformed: usize,
}
