//! CSV writer
//!
//! One `csv` encoder per writer fills a scratch buffer; each finished record
//! is handed to the output stream in one `write_all`. The output is never flushed or
//! closed here; that stays with whoever owns the stream.

use std::cell::RefCell;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::delimiter::Delimiter;
use super::error::CsvError;

/// Which fields get wrapped in quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePolicy {
    /// Every field is quoted regardless of content
    Always,
    /// Only fields containing the delimiter, a quote or a line break are quoted
    #[default]
    Necessary,
}

impl QuotePolicy {
    fn style(self) -> csv::QuoteStyle {
        match self {
            QuotePolicy::Always => csv::QuoteStyle::Always,
            QuotePolicy::Necessary => csv::QuoteStyle::Necessary,
        }
    }
}

impl std::str::FromStr for QuotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(QuotePolicy::Always),
            "necessary" | "needed" => Ok(QuotePolicy::Necessary),
            other => Err(format!("unknown quote policy '{}'", other)),
        }
    }
}

/// Byte order mark; the reader drops it from the very start of a stream
const BOM: char = '\u{feff}';

/// Encoder output, drained into the real stream after every record
#[derive(Debug, Default)]
struct Scratch(RefCell<Vec<u8>>);

impl Write for Scratch {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.get_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes records as CRLF-terminated CSV lines
#[derive(Debug)]
pub struct CsvWriter<W> {
    output: W,
    encoder: csv::Writer<Scratch>,
    delimiter: Delimiter,
    quote_policy: QuotePolicy,
    records_written: usize,
}

impl<W: Write> CsvWriter<W> {
    /// Create a comma-separated writer that quotes only when necessary
    pub fn new(output: W) -> Self {
        let delimiter = Delimiter::Comma;
        let quote_policy = QuotePolicy::Necessary;
        Self {
            output,
            encoder: build_encoder(delimiter, quote_policy.style()),
            delimiter,
            quote_policy,
            records_written: 0,
        }
    }

    pub fn with_quote_policy(mut self, quote_policy: QuotePolicy) -> Self {
        self.quote_policy = quote_policy;
        self.encoder = build_encoder(self.delimiter, quote_policy.style());
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self.encoder = build_encoder(delimiter, self.quote_policy.style());
        self
    }

    pub fn quote_policy(&self) -> QuotePolicy {
        self.quote_policy
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn get_ref(&self) -> &W {
        &self.output
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    /// Write one record followed by CRLF
    ///
    /// Fields are quoted per the quote policy with internal quotes doubled.
    /// A record made of a single empty field is written as `""` so that it
    /// reads back as one field rather than as a bare line break. The first
    /// record is fully quoted when its first field starts with a byte order
    /// mark, which would otherwise be dropped on read.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<(), CsvError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut fields = record.into_iter().peekable();
        let leading_bom = self.records_written == 0
            && self.quote_policy != QuotePolicy::Always
            && fields.peek().is_some_and(|f| f.as_ref().starts_with(BOM));

        let written = if leading_bom {
            let mut encoder = build_encoder(self.delimiter, csv::QuoteStyle::Always);
            let written = encode_into(&mut encoder, fields, &mut self.output)?;
            tracing::debug!("Quoted first record to keep its leading byte order mark");
            written
        } else {
            encode_into(&mut self.encoder, fields, &mut self.output)?
        };

        self.records_written += 1;
        tracing::trace!(
            record = self.records_written,
            bytes = written,
            "Wrote CSV record"
        );
        Ok(())
    }

    /// Append one record to a stream positioned at its end
    ///
    /// Encodes exactly like [`write_record`](Self::write_record); nothing
    /// already in the stream is rewritten.
    pub fn append_record<I, T>(&mut self, record: I) -> Result<(), CsvError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.write_record(record)
    }

    /// Write every record in order
    pub fn write_all<I, R, T>(&mut self, table: I) -> Result<(), CsvError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let before = self.records_written;
        for record in table {
            self.write_record(record)?;
        }
        tracing::debug!(
            records = self.records_written - before,
            quote_policy = ?self.quote_policy,
            "Wrote CSV table"
        );
        Ok(())
    }
}

fn build_encoder(delimiter: Delimiter, style: csv::QuoteStyle) -> csv::Writer<Scratch> {
    csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .quote_style(style)
        .terminator(csv::Terminator::CRLF)
        .double_quote(true)
        .flexible(true)
        .has_headers(false)
        .from_writer(Scratch::default())
}

/// Encode one record and hand it to `output` in a single `write_all`
///
/// Returns the number of bytes written. `output` is never flushed.
fn encode_into<I, T, W>(
    encoder: &mut csv::Writer<Scratch>,
    fields: I,
    output: &mut W,
) -> Result<usize, CsvError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
    W: Write,
{
    for field in fields {
        encoder.write_field(field.as_ref())?;
    }
    encoder.write_record(None::<&[u8]>)?;
    encoder.flush()?;

    let mut encoded = encoder.get_ref().0.borrow_mut();
    let result = output.write_all(&encoded);
    let written = encoded.len();
    encoded.clear();
    result?;
    Ok(written)
}
