//! LaTeX .aux file parsing
//!
//! A compiled .aux file lists the citation keys a document uses, one
//! backslash command per line, possibly spread over included .aux files via
//! `\@input`. This crate extracts them into an ordered, de-duplicated
//! [`CitationSet`] together with the `\bibdata` metadata that names the
//! bibliography output.

mod citations;
mod error;
mod reader;

pub use citations::CitationSet;
pub use error::AuxError;
pub use reader::{parse_document, parse_file, AUX_SUFFIX};
