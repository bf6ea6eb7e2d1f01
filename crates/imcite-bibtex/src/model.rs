//! BibTeX data model
//!
//! Entries keep their fields in source order and their type and field names
//! in the case they were written with; lookups are case-insensitive where
//! the format is (types, field names) and case-sensitive where it is not
//! (entry keys).

use std::collections::HashMap;

use crate::error::BibtexError;

/// A single field of an entry (name as written, value fully resolved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// One bibliographic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry type as written in the source, e.g. "article" or "ARTICLE"
    pub entry_type: String,
    /// Citation key, case-sensitive
    pub key: String,
    fields: Vec<Field>,
}

impl Entry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Set a field value. Redefining a field (case-insensitive name match)
    /// overwrites the earlier value in place, keeping its position.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&name))
        {
            existing.value = value;
        } else {
            self.fields.push(Field { name, value });
        }
    }

    /// Get a field value by name (case-insensitive)
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// Fields in insertion order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields as a (lowercased name -> value) map, for equality checks
    pub fn field_map(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.to_ascii_lowercase(), f.value.clone()))
            .collect()
    }
}

/// An ordered collection of entries with O(1) lookup by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibliographyData {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl BibliographyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, rejecting a key already present
    pub fn insert(&mut self, entry: Entry) -> Result<(), BibtexError> {
        if self.index.contains_key(&entry.key) {
            return Err(BibtexError::DuplicateKey { key: entry.key });
        }
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Entries in source order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a new database containing clones of the entries whose key
    /// appears in `keys`, in the order the keys are given. Keys not present
    /// here are skipped silently; reporting them is the caller's concern.
    pub fn select<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> BibliographyData {
        let mut out = BibliographyData::new();
        for key in keys {
            if out.contains_key(key) {
                continue;
            }
            if let Some(entry) = self.get(key) {
                // Key uniqueness is guaranteed by the two checks above.
                let _ = out.insert(entry.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> Entry {
        let mut e = Entry::new("article", key);
        e.set_field("title", format!("About {key}"));
        e
    }

    #[test]
    fn test_field_access_case_insensitive() {
        let mut e = Entry::new("article", "Smith2024");
        e.set_field("Title", "A Great Paper");
        e.set_field("YEAR", "2024");

        assert_eq!(e.field("title"), Some("A Great Paper"));
        assert_eq!(e.field("year"), Some("2024"));
        assert_eq!(e.field("author"), None);
    }

    #[test]
    fn test_field_redefinition_last_wins_in_place() {
        let mut e = Entry::new("article", "Smith2024");
        e.set_field("title", "First");
        e.set_field("year", "2024");
        e.set_field("TITLE", "Second");

        assert_eq!(e.field("title"), Some("Second"));
        // Position of the first definition is kept.
        assert_eq!(e.fields()[0].name, "title");
        assert_eq!(e.fields().len(), 2);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut db = BibliographyData::new();
        db.insert(entry("A")).unwrap();
        let err = db.insert(entry("A")).unwrap_err();
        assert!(matches!(err, BibtexError::DuplicateKey { key } if key == "A"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut db = BibliographyData::new();
        db.insert(entry("Knuth1984")).unwrap();
        assert!(db.contains_key("Knuth1984"));
        assert!(!db.contains_key("knuth1984"));
    }

    #[test]
    fn test_select_follows_citation_order() {
        let mut db = BibliographyData::new();
        for key in ["A", "B", "C"] {
            db.insert(entry(key)).unwrap();
        }

        let out = db.select(["C", "A"]);
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["C", "A"]);
    }

    #[test]
    fn test_select_skips_missing_and_repeated_keys() {
        let mut db = BibliographyData::new();
        db.insert(entry("A")).unwrap();
        db.insert(entry("C")).unwrap();

        let out = db.select(["A", "B", "C", "A"]);
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[test]
    fn test_select_output_owns_its_entries() {
        let mut db = BibliographyData::new();
        db.insert(entry("A")).unwrap();

        let out = db.select(["A"]);
        drop(db);
        assert_eq!(out.get("A").unwrap().field("title"), Some("About A"));
    }
}
