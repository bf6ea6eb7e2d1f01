//! Pipeline core for imcite
//!
//! Composes the .aux reader and the BibTeX reader/writer into the
//! operations the CLI exposes: building a per-document bibliography from a
//! master database, listing cited/missing/all keys, and showing a single
//! entry. Also carries the layered configuration and the external bibtex
//! invocation.

pub mod config;
mod engine;
mod error;
mod pipeline;

pub use config::Config;
pub use engine::run_bibtex;
pub use error::Error;
pub use pipeline::{cited_keys, db_keys, make_bib, missing_keys, show_entry, BIB_SUFFIX};
