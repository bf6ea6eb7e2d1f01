//! BibTeX serialization
//!
//! Emits entries back to BibTeX text. Field values are always brace
//! delimited and identifiers keep the case they were stored with, so the
//! output reparses to the same resolved content without needing any macro
//! definitions. @string and @preamble constructs are never re-emitted.

use crate::model::{BibliographyData, Entry};

/// Serialize a whole database, entries in their stored order separated by
/// blank lines
pub fn serialize(db: &BibliographyData) -> String {
    let mut out = String::new();
    for entry in db.entries() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&serialize_entry(entry));
    }
    out
}

/// Serialize a single entry
pub fn serialize_entry(entry: &Entry) -> String {
    let mut out = String::new();
    out.push('@');
    out.push_str(&entry.entry_type);
    out.push('{');
    out.push_str(&entry.key);
    out.push_str(",\n");
    for field in entry.fields() {
        out.push_str("  ");
        out.push_str(&field.name);
        out.push_str(" = {");
        out.push_str(&field.value);
        out.push_str("},\n");
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_entry_layout() {
        let mut entry = Entry::new("article", "Smith2024");
        entry.set_field("author", "John Smith");
        entry.set_field("year", "2024");

        assert_eq!(
            serialize_entry(&entry),
            "@article{Smith2024,\n  author = {John Smith},\n  year = {2024},\n}\n"
        );
    }

    #[test]
    fn test_values_always_braced() {
        let mut entry = Entry::new("article", "Test");
        entry.set_field("year", "2024");

        // Numeric values get braces too; bare tokens would be re-resolved
        // as macros on the next parse.
        assert!(serialize_entry(&entry).contains("year = {2024},"));
    }

    #[test]
    fn test_identifier_case_preserved() {
        let mut entry = Entry::new("ARTICLE", "Test");
        entry.set_field("Title", "Kept");

        let text = serialize_entry(&entry);
        assert!(text.starts_with("@ARTICLE{Test,"));
        assert!(text.contains("  Title = {Kept},"));
    }

    #[test]
    fn test_serialize_database_blank_line_between_entries() {
        let mut db = BibliographyData::new();
        db.insert(Entry::new("book", "A")).unwrap();
        db.insert(Entry::new("book", "B")).unwrap();

        assert_eq!(serialize(&db), "@book{A,\n}\n\n@book{B,\n}\n");
    }

    #[test]
    fn test_serialize_empty_database() {
        assert_eq!(serialize(&BibliographyData::new()), "");
    }
}
