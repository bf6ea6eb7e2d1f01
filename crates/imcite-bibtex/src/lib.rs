//! BibTeX database parsing and serialization
//!
//! This crate provides the in-memory model for a BibTeX database together
//! with a strict parser and a deterministic serializer:
//! - Nom-based parser with precise line/column error reporting
//! - @string macro definitions and # concatenation, resolved at parse time
//! - Braced and quoted field values with nested braces
//! - Duplicate entry keys rejected
//! - Serializer emits entries losslessly for the accepted subset of syntax

mod error;
mod model;
pub mod parser;
pub mod writer;

pub use error::BibtexError;
pub use model::{BibliographyData, Entry, Field};
pub use parser::{parse, parse_file};
pub use writer::{serialize, serialize_entry};
