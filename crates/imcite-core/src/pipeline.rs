//! Pipeline operations composing the aux and bibtex readers

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Suffix of generated bibliography files
pub const BIB_SUFFIX: &str = ".bib";

/// Extract the entries cited by a document from the master database and
/// write them as `<declared basename>.bib`. Cited keys missing from the
/// database are skipped, not errors; see [`missing_keys`] for reporting.
/// Returns the path of the written file.
pub fn make_bib(basename: &str, db_path: &Path) -> Result<PathBuf, Error> {
    let citations = imcite_aux::parse_document(basename)?;
    let db = imcite_bibtex::parse_file(db_path)?;

    let selected = db.select(citations.citations().iter().map(String::as_str));
    let out_base = citations.output_basename().ok_or(Error::NoBibdata)?;
    let out_path = PathBuf::from(format!("{out_base}{BIB_SUFFIX}"));

    fs::write(&out_path, imcite_bibtex::serialize(&selected)).map_err(|source| Error::Write {
        path: out_path.clone(),
        source,
    })?;
    tracing::info!(
        cited = citations.len(),
        written = selected.len(),
        "wrote {}",
        out_path.display()
    );
    Ok(out_path)
}

/// Keys cited by the document, in citation order
pub fn cited_keys(basename: &str) -> Result<Vec<String>, Error> {
    let citations = imcite_aux::parse_document(basename)?;
    Ok(citations.citations().to_vec())
}

/// All keys in the master database, in source order
pub fn db_keys(db_path: &Path) -> Result<Vec<String>, Error> {
    let db = imcite_bibtex::parse_file(db_path)?;
    Ok(db.keys().map(str::to_string).collect())
}

/// Cited keys absent from the master database, in citation order
pub fn missing_keys(basename: &str, db_path: &Path) -> Result<Vec<String>, Error> {
    let citations = imcite_aux::parse_document(basename)?;
    let db = imcite_bibtex::parse_file(db_path)?;
    Ok(citations
        .citations()
        .iter()
        .filter(|key| !db.contains_key(key))
        .cloned()
        .collect())
}

/// One database entry serialized as BibTeX, or None when the key is absent
pub fn show_entry(db_path: &Path, key: &str) -> Result<Option<String>, Error> {
    let db = imcite_bibtex::parse_file(db_path)?;
    Ok(db.get(key).map(imcite_bibtex::serialize_entry))
}
