//! Top-level error type for pipeline operations

use std::path::PathBuf;

use imcite_aux::AuxError;
use imcite_bibtex::BibtexError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Aux(#[from] AuxError),

    #[error(transparent)]
    Bibtex(#[from] BibtexError),

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file '{path}': {message}")]
    Config { path: PathBuf, message: String },

    #[error("the aux file declares no \\bibdata; nothing to write")]
    NoBibdata,

    #[error("failed to run `{command}`: {source}")]
    Engine {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
