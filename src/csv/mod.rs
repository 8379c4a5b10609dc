//! CSV reading and writing
//!
//! A strict, single-pass reader and a policy-driven writer for
//! comma-separated text:
//! - fields separated by a delimiter (comma unless configured)
//! - double-quoted fields may hold delimiters, quotes (doubled) and line breaks
//! - CR, LF and CRLF all end a record on read; CRLF is written
//!
//! ```text
//! bytes ──► CsvReader::read_all ──► Table ──► CsvWriter::write_all ──► bytes
//! ```
//!
//! Any table whose records have at least one field survives a write/read
//! round-trip unchanged.

mod delimiter;
mod error;
mod reader;
mod writer;

pub use delimiter::Delimiter;
pub use error::{CsvError, ParseError, ParseErrorKind};
pub use reader::CsvReader;
pub use writer::{CsvWriter, QuotePolicy};

/// One row of fields
pub type Record = Vec<String>;

/// Rows in file order; rows may differ in length
pub type Table = Vec<Record>;
