//! Error taxonomy. Every variant is fatal to the run; cancellation is not an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for tabsort operations
#[derive(Error, Debug)]
pub enum SortError {
    /// Conflicting or invalid options; the pipeline never starts.
    #[error("usage: {0}")]
    Usage(String),

    /// A file or directory could not be opened, read, or written.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed row content within a single source.
    #[error("cannot decode '{origin}': {reason}")]
    Decode { origin: String, reason: String },

    /// Requested sort field is past the last column of the first row.
    #[error("only {columns} column(s) in this data, cannot sort by field {field}")]
    InvalidColumn { field: usize, columns: usize },

    /// A pipeline stage thread panicked.
    #[error("{0} thread panicked")]
    StagePanicked(&'static str),
}

impl SortError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SortError::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert a walkdir failure. Loop detection carries no io error, so it is synthesized.
    pub fn from_walk(err: walkdir::Error, root: &std::path::Path) -> Self {
        let path = err
            .path()
            .map(PathBuf::from)
            .unwrap_or_else(|| root.to_path_buf());
        let msg = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(msg));
        SortError::Io { path, source }
    }
}
