//! Error types for CSV reading and writing

use std::fmt;
use std::io;

/// What went wrong while tokenizing a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The stream ended inside a quoted field
    UnterminatedQuote,
    /// A quote appeared inside an unquoted field
    UnexpectedQuote,
    /// Something other than a delimiter or line break followed a closing quote
    TrailingCharacters,
    /// A field was not valid UTF-8
    InvalidUtf8,
}

impl ParseErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::UnterminatedQuote => "unterminated quoted field",
            Self::UnexpectedQuote => "unexpected quote in unquoted field",
            Self::TrailingCharacters => "unexpected characters after closing quote",
            Self::InvalidUtf8 => "field is not valid UTF-8",
        }
    }
}

/// Malformed CSV input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line where the problem was detected
    pub line: usize,
    /// 1-based number of the record being read
    pub record: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CSV parse error at line {} (record {}): {}",
            self.line,
            self.record,
            self.kind.describe()
        )
    }
}

impl std::error::Error for ParseError {}

/// Error returned by [`CsvReader`](super::CsvReader) and [`CsvWriter`](super::CsvWriter)
#[derive(Debug)]
pub enum CsvError {
    /// The underlying stream failed
    Io(io::Error),
    /// The input was not well-formed CSV
    Parse(ParseError),
}

impl CsvError {
    /// The parse error, if this is one
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Io(_) => None,
        }
    }
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "CSV I/O error: {}", e),
            Self::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseError> for CsvError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        Self::Io(io::Error::from(e))
    }
}
