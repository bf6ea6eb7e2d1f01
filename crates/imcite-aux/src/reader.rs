//! .aux file reader
//!
//! Recognized commands, one per line:
//! - `\citation{K1,K2,...}` appends keys in order, de-duplicated
//! - `\bibdata{B1,B2,...}` records output-basename metadata
//! - `\bibstyle{S}` is ignored
//! - `\@input{F}` recursively reads F (relative to the current file's
//!   directory) before the lines that follow it
//!
//! Anything else is ignored; the format is permissive by nature. A visited
//! set of canonical paths bounds the `\@input` recursion, so a cyclic
//! include graph fails instead of recursing forever.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::citations::CitationSet;
use crate::error::AuxError;

/// Suffix of compiled cross-reference files
pub const AUX_SUFFIX: &str = ".aux";

/// Parse the .aux file for a document basename (`basename` + ".aux")
pub fn parse_document(basename: &str) -> Result<CitationSet, AuxError> {
    parse_file(format!("{basename}{AUX_SUFFIX}"))
}

/// Parse an .aux file and everything it includes
pub fn parse_file(path: impl AsRef<Path>) -> Result<CitationSet, AuxError> {
    let mut set = CitationSet::new();
    let mut visited = HashSet::new();
    parse_into(path.as_ref(), &mut set, &mut visited)?;
    tracing::debug!(
        citations = set.len(),
        bibdata = set.bibdata().len(),
        "parsed aux file {}",
        path.as_ref().display()
    );
    Ok(set)
}

fn parse_into(
    path: &Path,
    set: &mut CitationSet,
    visited: &mut HashSet<PathBuf>,
) -> Result<(), AuxError> {
    let canonical = fs::canonicalize(path).map_err(|source| AuxError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !visited.insert(canonical) {
        return Err(AuxError::Cycle {
            path: path.to_path_buf(),
        });
    }

    let text = read_text(path)?;
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let Some((command, rest)) = split_command(line) else {
            continue;
        };
        if !matches!(command, "citation" | "bibdata" | "bibstyle" | "@input") {
            continue;
        }
        let arg = braced_argument(rest).ok_or_else(|| AuxError::Format {
            path: path.to_path_buf(),
            line: idx as u32 + 1,
            message: format!("malformed \\{command} argument"),
        })?;
        match command {
            "citation" => {
                for key in arg.split(',') {
                    let key = key.trim();
                    if !key.is_empty() {
                        set.add_citation(key);
                    }
                }
            }
            "bibdata" => {
                for name in arg.split(',') {
                    let name = name.trim();
                    if !name.is_empty() {
                        set.add_bibdata(name);
                    }
                }
            }
            "bibstyle" => {}
            "@input" => {
                let target = dir.join(arg);
                tracing::debug!("following \\@input to {}", target.display());
                parse_into(&target, set, visited)?;
            }
            _ => unreachable!(),
        }
    }
    Ok(())
}

/// Read a file as UTF-8, falling back to Latin-1 when decoding fails
fn read_text(path: &Path) -> Result<String, AuxError> {
    let bytes = fs::read(path).map_err(|source| AuxError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        // In Latin-1 every byte is the code point of the same value.
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}

/// Split a `\command{...}` line into the command name and its tail
fn split_command(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('\\')?;
    let end = rest.find('{').unwrap_or(rest.len());
    Some((&rest[..end], &rest[end..]))
}

/// Extract the content of a `{...}` argument; aux arguments never nest
fn braced_argument(rest: &str) -> Option<&str> {
    let inner = rest.strip_prefix('{')?;
    let end = inner.find('}')?;
    Some(&inner[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_aux(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_citations_in_first_occurrence_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_aux(
            dir.path(),
            "doc.aux",
            "\\relax\n\\citation{A,B,A}\n\\citation{B}\n\\bibdata{doc}\n\\bibstyle{plain}\n",
        );

        let set = parse_file(&path).unwrap();
        assert_eq!(set.citations(), ["A", "B"]);
        assert_eq!(set.output_basename(), Some("doc"));
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_aux(
            dir.path(),
            "doc.aux",
            "\\newlabel{sec:intro}{{1}{1}}\nplain text\n\\citation{Only}\n",
        );

        let set = parse_file(&path).unwrap();
        assert_eq!(set.citations(), ["Only"]);
    }

    #[test]
    fn test_malformed_citation_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_aux(dir.path(), "doc.aux", "\\relax\n\\citation{Broken\n");

        match parse_file(&path).unwrap_err() {
            AuxError::Format { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("citation"));
            }
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn test_input_merges_included_citations_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        write_aux(dir.path(), "chapter.aux", "\\citation{Inner}\n");
        let main = write_aux(
            dir.path(),
            "doc.aux",
            "\\citation{First}\n\\@input{chapter.aux}\n\\citation{Last}\n",
        );

        let set = parse_file(&main).unwrap();
        assert_eq!(set.citations(), ["First", "Inner", "Last"]);
    }

    #[test]
    fn test_include_cycle_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_aux(dir.path(), "a.aux", "\\@input{b.aux}\n");
        write_aux(dir.path(), "b.aux", "\\@input{a.aux}\n");

        let err = parse_file(dir.path().join("a.aux")).unwrap_err();
        assert!(matches!(err, AuxError::Cycle { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_include_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_aux(dir.path(), "doc.aux", "\\@input{nowhere.aux}\n");

        assert!(matches!(
            parse_file(&path).unwrap_err(),
            AuxError::Io { .. }
        ));
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.aux");
        // "M\xfcller" is not valid UTF-8.
        fs::write(&path, b"\\citation{M\xfcller2020}\n").unwrap();

        let set = parse_file(&path).unwrap();
        assert_eq!(set.citations(), ["Müller2020"]);
    }

    #[test]
    fn test_parse_document_appends_suffix() {
        let dir = tempfile::tempdir().unwrap();
        write_aux(dir.path(), "thesis.aux", "\\citation{X}\n");

        let basename = dir.path().join("thesis");
        let set = parse_document(basename.to_str().unwrap()).unwrap();
        assert_eq!(set.citations(), ["X"]);
    }
}
