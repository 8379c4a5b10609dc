//! Strict CSV reader
//!
//! Single-pass tokenizer over a buffered byte stream. The delimiter, quote
//! and line-break characters are all ASCII, so fields are split on raw bytes
//! and only decoded as UTF-8 once complete.

use std::io::{BufRead, BufReader, Read};

use super::delimiter::Delimiter;
use super::error::{CsvError, ParseError, ParseErrorKind};
use super::{Record, Table};

const QUOTE: u8 = b'"';
const CR: u8 = b'\r';
const LF: u8 = b'\n';
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// How a field was terminated
enum FieldEnd {
    Delimiter,
    LineBreak,
    Eof,
}

/// Reads records from a byte stream
///
/// The reader takes ownership of whatever it is given. To keep using a stream
/// afterwards, pass a mutable reference (`CsvReader::new(&mut file)`). The
/// stream is never closed by the reader.
#[derive(Debug)]
pub struct CsvReader<R> {
    input: BufReader<R>,
    delimiter: u8,
    line: usize,
    records_read: usize,
    at_start: bool,
    failed: bool,
}

impl<R: Read> CsvReader<R> {
    /// Create a comma-separated reader
    pub fn new(input: R) -> Self {
        Self {
            input: BufReader::new(input),
            delimiter: Delimiter::Comma.byte(),
            line: 1,
            records_read: 0,
            at_start: true,
            failed: false,
        }
    }

    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter.byte();
        self
    }

    /// Current 1-based line in the input
    pub fn line(&self) -> usize {
        self.line
    }

    /// Number of records returned so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &R {
        self.input.get_ref()
    }

    /// Unwrap the underlying stream. Input buffered but not yet parsed is lost.
    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }

    /// Read the next record, or `None` at end of stream
    ///
    /// An empty line is a record holding a single empty field. A line break
    /// directly before end of stream does not start another record.
    pub fn read_record(&mut self) -> Result<Option<Record>, CsvError> {
        if self.at_start {
            self.skip_bom()?;
            self.at_start = false;
        }

        if self.peek()?.is_none() {
            return Ok(None);
        }

        let mut record = Vec::new();
        loop {
            let mut field = Vec::new();
            let end = if self.peek()? == Some(QUOTE) {
                self.bump();
                self.read_quoted(&mut field)?
            } else {
                self.read_unquoted(&mut field)?
            };

            let value =
                String::from_utf8(field).map_err(|_| self.error(ParseErrorKind::InvalidUtf8))?;
            record.push(value);

            match end {
                FieldEnd::Delimiter => continue,
                FieldEnd::LineBreak | FieldEnd::Eof => break,
            }
        }

        self.records_read += 1;
        tracing::trace!(
            record = self.records_read,
            fields = record.len(),
            "Read CSV record"
        );
        Ok(Some(record))
    }

    /// Read every remaining record
    pub fn read_all(&mut self) -> Result<Table, CsvError> {
        let mut table = Vec::new();
        while let Some(record) = self.read_record()? {
            table.push(record);
        }
        tracing::debug!(records = table.len(), "Read CSV table");
        Ok(table)
    }

    fn read_unquoted(&mut self, field: &mut Vec<u8>) -> Result<FieldEnd, CsvError> {
        loop {
            match self.next_byte()? {
                None => return Ok(FieldEnd::Eof),
                Some(b) if b == self.delimiter => return Ok(FieldEnd::Delimiter),
                Some(b @ (CR | LF)) => {
                    self.finish_line(b)?;
                    return Ok(FieldEnd::LineBreak);
                }
                Some(QUOTE) => return Err(self.error(ParseErrorKind::UnexpectedQuote).into()),
                Some(b) => field.push(b),
            }
        }
    }

    /// Reads a quoted field; the opening quote has been consumed
    fn read_quoted(&mut self, field: &mut Vec<u8>) -> Result<FieldEnd, CsvError> {
        loop {
            match self.next_byte()? {
                None => return Err(self.error(ParseErrorKind::UnterminatedQuote).into()),
                Some(QUOTE) => {
                    if self.peek()? == Some(QUOTE) {
                        self.bump();
                        field.push(QUOTE);
                    } else {
                        return self.after_closing_quote();
                    }
                }
                Some(CR) => {
                    field.push(CR);
                    if self.peek()? == Some(LF) {
                        self.bump();
                        field.push(LF);
                    }
                    self.line += 1;
                }
                Some(LF) => {
                    field.push(LF);
                    self.line += 1;
                }
                Some(b) => field.push(b),
            }
        }
    }

    fn after_closing_quote(&mut self) -> Result<FieldEnd, CsvError> {
        match self.next_byte()? {
            None => Ok(FieldEnd::Eof),
            Some(b) if b == self.delimiter => Ok(FieldEnd::Delimiter),
            Some(b @ (CR | LF)) => {
                self.finish_line(b)?;
                Ok(FieldEnd::LineBreak)
            }
            Some(_) => Err(self.error(ParseErrorKind::TrailingCharacters).into()),
        }
    }

    /// Consume the LF of a CRLF pair and advance the line counter
    fn finish_line(&mut self, first: u8) -> Result<(), CsvError> {
        if first == CR && self.peek()? == Some(LF) {
            self.bump();
        }
        self.line += 1;
        Ok(())
    }

    fn skip_bom(&mut self) -> Result<(), CsvError> {
        if self.input.fill_buf()?.starts_with(BOM) {
            self.input.consume(BOM.len());
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<u8>, CsvError> {
        Ok(self.input.fill_buf()?.first().copied())
    }

    fn bump(&mut self) {
        self.input.consume(1);
    }

    fn next_byte(&mut self) -> Result<Option<u8>, CsvError> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.bump();
        }
        Ok(byte)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.line,
            record: self.records_read + 1,
        }
    }
}

/// Yields records until end of stream; stops after the first error
impl<R: Read> Iterator for CsvReader<R> {
    type Item = Result<Record, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.read_record().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}
