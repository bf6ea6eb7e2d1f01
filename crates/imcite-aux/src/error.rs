//! Error types for .aux parsing

use std::path::PathBuf;

/// Errors produced while reading an .aux file tree
#[derive(Debug, thiserror::Error)]
pub enum AuxError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Format {
        path: PathBuf,
        line: u32,
        message: String,
    },

    #[error("include cycle: '{path}' was already read")]
    Cycle { path: PathBuf },
}
