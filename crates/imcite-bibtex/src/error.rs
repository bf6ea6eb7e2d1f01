//! Error types for BibTeX parsing

use std::path::PathBuf;

/// Errors produced while reading or parsing a BibTeX database
#[derive(Debug, thiserror::Error)]
pub enum BibtexError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("duplicate entry key `{key}`")]
    DuplicateKey { key: String },

    #[error("undefined string macro `{name}` at line {line}")]
    UndefinedMacro { name: String, line: u32 },
}
