//! BibTeX parser implementation using nom
//!
//! This parser handles standard BibTeX format including:
//! - @string definitions (last definition wins, names case-insensitive)
//! - @preamble declarations (parsed and discarded)
//! - @comment sections and free text between constructs
//! - Entry bodies delimited by {} or ()
//! - Braced and quoted field values with nested braces
//! - String concatenation with #
//!
//! Macros are resolved at the point of reference; a reference to a macro
//! that has not been defined yet is a hard error, as is a duplicate entry
//! key. Errors carry a 1-based line/column position.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::take_while1,
    character::complete::multispace0,
    error::{ErrorKind, ParseError},
    IResult,
};

use crate::error::BibtexError;
use crate::model::{BibliographyData, Entry};

/// Parse a BibTeX database file
pub fn parse_file(path: impl AsRef<Path>) -> Result<BibliographyData, BibtexError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| BibtexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// Parse a BibTeX database from a string
pub fn parse(input: &str) -> Result<BibliographyData, BibtexError> {
    let mut db = BibliographyData::new();
    let mut macros = Macros::with_month_defaults();

    let mut remaining = input;
    loop {
        // Free text between constructs is legal and discarded.
        remaining = match remaining.find('@') {
            Some(pos) => &remaining[pos..],
            None => break,
        };
        match construct(remaining, &macros) {
            Ok((rest, parsed)) => {
                match parsed {
                    Construct::Entry(entry) => db.insert(entry)?,
                    Construct::Macro(name, value) => macros.define(name, value),
                    Construct::Ignored => {}
                }
                remaining = rest;
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(at_position(input, e));
            }
            Err(nom::Err::Incomplete(_)) => {
                let (line, column) = line_column(input, input.len());
                return Err(BibtexError::Parse {
                    line,
                    column,
                    message: "unexpected end of input".to_string(),
                });
            }
        }
    }
    Ok(db)
}

/// String macro table, keyed by lowercased name
struct Macros(HashMap<String, String>);

impl Macros {
    /// The standard month macros are always available, as BibTeX
    /// implementations provide them without a @string definition.
    fn with_month_defaults() -> Self {
        const MONTHS: [(&str, &str); 12] = [
            ("jan", "January"),
            ("feb", "February"),
            ("mar", "March"),
            ("apr", "April"),
            ("may", "May"),
            ("jun", "June"),
            ("jul", "July"),
            ("aug", "August"),
            ("sep", "September"),
            ("oct", "October"),
            ("nov", "November"),
            ("dec", "December"),
        ];
        Self(
            MONTHS
                .iter()
                .map(|&(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    fn define(&mut self, name: String, value: String) {
        self.0.insert(name.to_ascii_lowercase(), value);
    }
}

/// Why a parse attempt failed, pinned to the unconsumed input
#[derive(Debug)]
struct PError<'a> {
    input: &'a str,
    cause: Cause,
}

#[derive(Debug)]
enum Cause {
    Syntax(String),
    UndefinedMacro(String),
}

impl<'a> ParseError<&'a str> for PError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        PError {
            input,
            cause: Cause::Syntax(kind.description().to_string()),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, PError<'a>>;

fn syntax_failure<'a>(input: &'a str, message: impl Into<String>) -> nom::Err<PError<'a>> {
    nom::Err::Failure(PError {
        input,
        cause: Cause::Syntax(message.into()),
    })
}

/// Convert a pinned parse failure into a positioned public error
fn at_position(full: &str, err: PError<'_>) -> BibtexError {
    let offset = full.len() - err.input.len();
    let (line, column) = line_column(full, offset);
    match err.cause {
        Cause::Syntax(message) => BibtexError::Parse {
            line,
            column,
            message,
        },
        Cause::UndefinedMacro(name) => BibtexError::UndefinedMacro { name, line },
    }
}

fn line_column(text: &str, offset: usize) -> (u32, u32) {
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
    let column = (offset - line_start) as u32 + 1;
    (line, column)
}

/// Result of parsing one @ construct
enum Construct {
    Entry(Entry),
    Macro(String, String),
    Ignored,
}

fn expect_char<'a>(input: &'a str, c: char, context: &str) -> PResult<'a, ()> {
    match input.strip_prefix(c) {
        Some(rest) => Ok((rest, ())),
        None => Err(syntax_failure(input, format!("expected `{c}` {context}"))),
    }
}

/// Consume `{` or `(` and report the matching closer
fn open_delim(input: &str) -> PResult<'_, char> {
    if let Some(rest) = input.strip_prefix('{') {
        Ok((rest, '}'))
    } else if let Some(rest) = input.strip_prefix('(') {
        Ok((rest, ')'))
    } else {
        Err(syntax_failure(input, "expected `{` or `(`"))
    }
}

fn identifier(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '+')
    })(input)
}

/// Parse one @ construct (entry, string, preamble, or comment)
fn construct<'a>(input: &'a str, macros: &Macros) -> PResult<'a, Construct> {
    let (rest, _) = expect_char(input, '@', "to open a construct")?;
    let (rest, _) = multispace0(rest)?;
    let (rest, kind) = match take_while1::<_, _, PError>(|c: char| c.is_ascii_alphanumeric())(rest)
    {
        Ok(parsed) => parsed,
        Err(_) => return Err(syntax_failure(rest, "expected a construct name after `@`")),
    };

    match kind.to_ascii_lowercase().as_str() {
        "string" => string_definition(rest, macros),
        "preamble" => {
            let (rest, _) = preamble(rest, macros)?;
            Ok((rest, Construct::Ignored))
        }
        "comment" => {
            let (rest, _) = comment_body(rest)?;
            Ok((rest, Construct::Ignored))
        }
        _ => entry_body(rest, kind, macros),
    }
}

/// Parse a @string definition body
fn string_definition<'a>(input: &'a str, macros: &Macros) -> PResult<'a, Construct> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delim(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, name) = match identifier(rest) {
        Ok(parsed) => parsed,
        Err(_) => return Err(syntax_failure(rest, "expected a macro name in @string")),
    };
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = expect_char(rest, '=', "after the macro name")?;
    let (rest, value) = field_value(rest, macros)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = expect_char(rest, close, "to close @string")?;
    Ok((rest, Construct::Macro(name.to_string(), value)))
}

/// Parse a @preamble body; the value is checked but not kept
fn preamble<'a>(input: &'a str, macros: &Macros) -> PResult<'a, ()> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delim(rest)?;
    let (rest, _) = field_value(rest, macros)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = expect_char(rest, close, "to close @preamble")?;
    Ok((rest, ()))
}

/// Skip a @comment body (braced group, or the rest of the line)
fn comment_body(input: &str) -> PResult<'_, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

/// Parse an entry body: key followed by comma-separated fields
fn entry_body<'a>(input: &'a str, entry_type: &str, macros: &Macros) -> PResult<'a, Construct> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delim(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) = entry_key(rest, close)?;
    let mut entry = Entry::new(entry_type, key);

    let (rest, _) = multispace0(rest)?;
    let mut remaining = rest;
    if let Some(stripped) = remaining.strip_prefix(',') {
        let (rest, parsed) = fields(stripped, close, macros)?;
        for (name, value) in parsed {
            entry.set_field(name, value);
        }
        remaining = rest;
    }
    let (rest, _) = multispace0(remaining)?;
    let (rest, _) = expect_char(rest, close, "to close the entry")?;
    Ok((rest, Construct::Entry(entry)))
}

fn entry_key<'a>(input: &'a str, close: char) -> PResult<'a, &'a str> {
    match take_while1::<_, _, PError>(|c: char| {
        c.is_ascii_graphic() && !matches!(c, '{' | '}' | ',') && c != close
    })(input)
    {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(syntax_failure(input, "expected an entry key")),
    }
}

/// Parse `name = value` pairs until the closing delimiter; a trailing
/// comma after the last field is accepted
fn fields<'a>(
    input: &'a str,
    close: char,
    macros: &Macros,
) -> PResult<'a, Vec<(String, String)>> {
    let mut out = Vec::new();
    let mut remaining = input;
    loop {
        let (rest, _) = multispace0(remaining)?;
        if rest.is_empty() || rest.starts_with(close) {
            return Ok((rest, out));
        }
        let (rest, name) = match identifier(rest) {
            Ok(parsed) => parsed,
            Err(_) => return Err(syntax_failure(rest, "expected a field name")),
        };
        let (rest, _) = multispace0(rest)?;
        let (rest, _) = expect_char(rest, '=', "after the field name")?;
        let (rest, value) = field_value(rest, macros)?;
        out.push((name.to_string(), value));

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix(',') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, out)),
        }
    }
}

/// Parse a field value: one or more `#`-joined tokens resolved into one string
fn field_value<'a>(input: &'a str, macros: &Macros) -> PResult<'a, String> {
    let mut value = String::new();
    let mut remaining = input;
    loop {
        let (rest, _) = multispace0(remaining)?;
        let (rest, part) = value_token(rest, macros)?;
        value.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, value)),
        }
    }
}

/// One value token: braced literal, quoted literal, digit run, or macro
fn value_token<'a>(input: &'a str, macros: &Macros) -> PResult<'a, String> {
    if input.starts_with('{') {
        let (rest, content) = braced_content(input)?;
        return Ok((rest, content.to_string()));
    }
    if input.starts_with('"') {
        let (rest, content) = quoted_content(input)?;
        return Ok((rest, content.to_string()));
    }
    if input.starts_with(|c: char| c.is_ascii_digit()) {
        let (rest, digits) = take_while1::<_, _, PError>(|c: char| c.is_ascii_digit())(input)?;
        return Ok((rest, digits.to_string()));
    }
    let (rest, name) = match identifier(input) {
        Ok(parsed) => parsed,
        Err(_) => return Err(syntax_failure(input, "expected a field value")),
    };
    match macros.get(name) {
        Some(resolved) => Ok((rest, resolved.to_string())),
        None => Err(nom::Err::Failure(PError {
            input,
            cause: Cause::UndefinedMacro(name.to_string()),
        })),
    }
}

/// Scan a balanced `{...}` group and return its inner content verbatim.
/// Backslash-escaped braces are not structural.
fn braced_content(input: &str) -> PResult<'_, &str> {
    if !input.starts_with('{') {
        return Err(syntax_failure(input, "expected `{`"));
    }
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[1..pos]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }
    Err(syntax_failure(input, "unbalanced `{` in value"))
}

/// Scan a `"..."` literal; a `"` only terminates at brace depth 0
fn quoted_content(input: &str) -> PResult<'_, &str> {
    if !input.starts_with('"') {
        return Err(syntax_failure(input, "expected `\"`"));
    }
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 1usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if depth == 0 => return Ok((&input[pos + 1..], &input[1..pos])),
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }
    Err(syntax_failure(input, "unterminated `\"` in value"))
}
