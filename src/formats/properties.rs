//! Java `.properties` documents
//!
//! Reading follows `java.util.Properties.load`:
//! - `#` and `!` start comment lines; blank lines are skipped
//! - the key ends at the first unescaped `=`, `:` or whitespace
//! - a line ending in an odd number of backslashes continues on the next
//!   line, whose leading whitespace is dropped
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded; any other
//!   escaped character stands for itself
//!
//! Files are read and written as UTF-8, so non-ASCII text is stored as is.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::document::{Document, DocumentError, DocumentFormat, DocumentStatus, DocumentType};
use crate::util::{is_likely_binary, FileOpenError};

/// One key and its value
pub type Property = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertiesErrorKind {
    /// `\u` not followed by four hex digits
    MalformedUnicodeEscape,
    /// A UTF-16 surrogate escape without its other half
    UnpairedSurrogate,
}

/// Malformed `.properties` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesError {
    pub kind: PropertiesErrorKind,
    /// 1-based line where the entry starts
    pub line: usize,
}

impl fmt::Display for PropertiesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            PropertiesErrorKind::MalformedUnicodeEscape => "malformed \\uXXXX escape",
            PropertiesErrorKind::UnpairedSurrogate => "unpaired surrogate in \\u escape",
        };
        write!(f, "properties error at line {}: {}", self.line, what)
    }
}

impl std::error::Error for PropertiesError {}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Split on `\r\n`, `\n` or a lone `\r`
fn natural_lines(input: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = input.as_bytes();
    let (mut start, mut i) = (0, 0);
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&input[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < input.len() {
        lines.push(&input[start..]);
    }
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = idx;
            break;
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let value = match rest.strip_prefix(|c: char| c == '=' || c == ':') {
        Some(after) => after.trim_start_matches(is_blank),
        None => rest,
    };
    (&line[..key_end], value)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut code = 0;
    for _ in 0..4 {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let error = |kind| PropertiesError { kind, line };
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_hex4(&mut chars)
                    .ok_or_else(|| error(PropertiesErrorKind::MalformedUnicodeEscape))?;
                let code = if (0xD800..0xDC00).contains(&unit) {
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut chars)
                            .ok_or_else(|| error(PropertiesErrorKind::MalformedUnicodeEscape))?,
                        _ => return Err(error(PropertiesErrorKind::UnpairedSurrogate)),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(error(PropertiesErrorKind::UnpairedSurrogate));
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                let ch = char::from_u32(code)
                    .ok_or_else(|| error(PropertiesErrorKind::UnpairedSurrogate))?;
                out.push(ch);
            }
            Some(other) => out.push(other),
            // A lone trailing backslash is dropped
            None => {}
        }
    }
    Ok(out)
}

/// Parse `.properties` text into entries in file order
///
/// A key that appears again keeps its first position and takes the later value.
pub fn parse_properties(input: &str) -> Result<Vec<Property>, PropertiesError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let lines = natural_lines(input);
    let mut entries: Vec<Property> = Vec::new();
    let mut next = 0;

    while next < lines.len() {
        let start_line = next + 1;
        let first = lines[next].trim_start_matches(is_blank);
        next += 1;
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut logical = first.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            let Some(line) = lines.get(next) else {
                break;
            };
            logical.push_str(line.trim_start_matches(is_blank));
            next += 1;
        }

        let (raw_key, raw_value) = split_entry(&logical);
        let key = unescape(raw_key, start_line)?;
        let value = unescape(raw_value, start_line)?;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }
    Ok(entries)
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}

/// Write entries as `key=value` lines, preceded by `comment` as `#` lines
pub fn write_properties<'a, W, I>(
    out: &mut W,
    entries: I,
    comment: Option<&str>,
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Property>,
{
    if let Some(comment) = comment {
        for line in natural_lines(comment) {
            writeln!(out, "#{}", line)?;
        }
    }

    let mut line = String::new();
    for (key, value) in entries {
        line.clear();
        escape_into(&mut line, key, true);
        line.push('=');
        escape_into(&mut line, value, false);
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Ordered key/value pairs of a `.properties` file
#[derive(Debug, Clone, Default)]
pub struct JavaPropertiesDocument {
    status: DocumentStatus,
    entries: Vec<Property>,
}

impl JavaPropertiesDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unmodified document holding `entries`
    pub fn from_entries(entries: Vec<Property>) -> Self {
        Self {
            status: DocumentStatus::new(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Property] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, appending the key if it is new
    ///
    /// Returns `true` and marks the document modified only if something changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) if v == value => return false,
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        self.status.set_modified(true);
        true
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        let (_, value) = self.entries.remove(index);
        self.status.set_modified(true);
        Some(value)
    }
}

impl Document for JavaPropertiesDocument {
    fn status(&self) -> &DocumentStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut DocumentStatus {
        &mut self.status
    }
}

/// Reads and writes Java `.properties` files
#[derive(Debug, Clone, Default)]
pub struct PropertiesFormat {
    /// Written as `#` lines at the top of saved files
    pub comment: Option<String>,
}

impl PropertiesFormat {
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
        }
    }
}

impl DocumentFormat for PropertiesFormat {
    type Document = JavaPropertiesDocument;

    fn document_type(&self) -> DocumentType {
        DocumentType::new("Java Properties", "*.properties")
    }

    fn default_name(&self) -> &str {
        "java"
    }

    fn default_extension(&self) -> &str {
        "properties"
    }

    fn create(&self) -> Result<JavaPropertiesDocument, DocumentError> {
        Ok(JavaPropertiesDocument::new())
    }

    fn read(&self, path: &Path) -> Result<JavaPropertiesDocument, DocumentError> {
        if is_likely_binary(path) {
            return Err(FileOpenError::BinaryFile.into());
        }
        let content = fs::read_to_string(path)?;
        let entries = parse_properties(&content)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "Read properties");
        Ok(JavaPropertiesDocument::from_entries(entries))
    }

    fn write(&self, document: &JavaPropertiesDocument, path: &Path) -> Result<(), DocumentError> {
        let mut out = BufWriter::new(File::create(path)?);
        write_properties(&mut out, document.entries(), self.comment.as_deref())?;
        out.flush()?;
        Ok(())
    }
}
