//! Citation data collected from an .aux file tree

use std::collections::HashSet;

/// Citation keys in first-occurrence order plus `\bibdata` metadata.
/// Built once by a parse run and read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct CitationSet {
    citations: Vec<String>,
    seen: HashSet<String>,
    bibdata: Vec<String>,
}

impl CitationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cited key; repeats keep the first occurrence's position
    pub(crate) fn add_citation(&mut self, key: &str) {
        if self.seen.insert(key.to_string()) {
            self.citations.push(key.to_string());
        }
    }

    pub(crate) fn add_bibdata(&mut self, name: &str) {
        self.bibdata.push(name.to_string());
    }

    /// Cited keys in first-occurrence order
    pub fn citations(&self) -> &[String] {
        &self.citations
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// All `\bibdata` arguments in appearance order
    pub fn bibdata(&self) -> &[String] {
        &self.bibdata
    }

    /// The basename the bibliography output is written under (the first
    /// `\bibdata` argument)
    pub fn output_basename(&self) -> Option<&str> {
        self.bibdata.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }
}
