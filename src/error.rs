use std::path::PathBuf;

use thiserror::Error;

/// File-level failure. Aborts the load call that produced it.
#[derive(Debug, Error)]
pub enum Error {
    /// A named file could not be opened or read.
    #[error("cannot read env file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A caller-supplied reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// A malformed line. Recoverable: the line is skipped and loading continues.
///
/// The message never contains the line text, since values are often secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed line {line}: {kind}")]
pub struct ParseError {
    pub line: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("zero length line")]
    ZeroLength,
    #[error("cannot separate key from value")]
    MissingSeparator,
    #[error("empty key")]
    EmptyKey,
}
