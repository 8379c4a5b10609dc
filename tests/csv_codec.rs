//! CSV reader/writer integration tests
//!
//! Reading real files, writing them back, and round-tripping awkward content.

mod common;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

use common::{awkward_table, mixed_table, record, sample_path};
use docforms::csv::{CsvError, CsvReader, CsvWriter, Delimiter, ParseErrorKind, QuotePolicy, Table};

fn write_table(table: &Table, policy: QuotePolicy) -> Vec<u8> {
    let mut writer = CsvWriter::new(Vec::new()).with_quote_policy(policy);
    writer.write_all(table).unwrap();
    writer.into_inner()
}

fn read_bytes(bytes: &[u8]) -> Table {
    CsvReader::new(bytes).read_all().unwrap()
}

/// Yields `data`, then fails with `kind`
struct FailingReader {
    data: io::Cursor<Vec<u8>>,
    kind: io::ErrorKind,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(self.kind, "stream failed")),
            n => Ok(n),
        }
    }
}

/// Rejects every write with `kind`
struct FailingWriter {
    kind: io::ErrorKind,
}

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(self.kind, "sink failed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn io_kind(err: CsvError) -> io::ErrorKind {
    match err {
        CsvError::Io(e) => e.kind(),
        CsvError::Parse(e) => panic!("Expected I/O error, got {}", e),
    }
}

// ========================================================================
// Reading
// ========================================================================

#[test]
fn test_read_mixed_sample() {
    let file = File::open(sample_path("mixed.csv")).unwrap();
    let table = CsvReader::new(file).read_all().unwrap();
    assert_eq!(table, mixed_table());
}

#[test]
fn test_read_single_record_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("single.csv");
    fs::write(&path, "AAAA,BBBB,CCCC\r\n").unwrap();

    let table = CsvReader::new(File::open(&path).unwrap()).read_all().unwrap();
    assert_eq!(table, vec![record(&["AAAA", "BBBB", "CCCC"])]);
}

#[test]
fn test_unterminated_quote_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "ok,row\r\n\"abc").unwrap();

    let err = CsvReader::new(File::open(&path).unwrap())
        .read_all()
        .unwrap_err();
    let parse = err.parse_error().expect("parse error");
    assert_eq!(parse.kind, ParseErrorKind::UnterminatedQuote);
    assert_eq!(parse.record, 2);
}

#[test]
fn test_reader_does_not_consume_stream_ownership() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("owned.csv");
    fs::write(&path, "a,b\r\n").unwrap();

    let mut file = File::open(&path).unwrap();
    let first = CsvReader::new(&mut file).read_all().unwrap();

    // The caller still owns the handle and can rewind and read again
    file.seek(SeekFrom::Start(0)).unwrap();
    let second = CsvReader::new(&mut file).read_all().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_read_error_mid_stream_is_io() {
    let mut reader = CsvReader::new(FailingReader {
        data: io::Cursor::new(b"a,b\r\nc,".to_vec()),
        kind: io::ErrorKind::ConnectionReset,
    });

    assert_eq!(reader.read_record().unwrap(), Some(record(&["a", "b"])));
    let err = reader.read_record().unwrap_err();
    assert_eq!(io_kind(err), io::ErrorKind::ConnectionReset);
}

#[test]
fn test_read_all_propagates_io_error() {
    let err = CsvReader::new(FailingReader {
        data: io::Cursor::new(b"x\r\ny\r\n\"open".to_vec()),
        kind: io::ErrorKind::TimedOut,
    })
    .read_all()
    .unwrap_err();
    assert_eq!(io_kind(err), io::ErrorKind::TimedOut);
}

// ========================================================================
// Writing
// ========================================================================

#[test]
fn test_write_errors_are_io() {
    let mut writer = CsvWriter::new(FailingWriter {
        kind: io::ErrorKind::BrokenPipe,
    });
    let err = writer.write_record(["a", "b"]).unwrap_err();
    assert_eq!(io_kind(err), io::ErrorKind::BrokenPipe);
    assert_eq!(writer.records_written(), 0);

    let err = writer.append_record(["c"]).unwrap_err();
    assert_eq!(io_kind(err), io::ErrorKind::BrokenPipe);

    let err = writer.write_all([["d"], ["e"]]).unwrap_err();
    assert_eq!(io_kind(err), io::ErrorKind::BrokenPipe);
}

#[test]
fn test_append_record_to_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-append-record.csv");
    File::create(&path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    CsvWriter::new(&mut file)
        .append_record(["AAAA", "BBBB", "CCCC"])
        .unwrap();
    file.flush().unwrap();
    drop(file);

    // Strings, commas, trailing CR/LF
    assert_eq!(fs::metadata(&path).unwrap().len(), 16);
}

#[test]
fn test_append_keeps_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, "when,what\r\n").unwrap();

    for event in [["09:00", "start"], ["09:05", "stop, then restart"]] {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        CsvWriter::new(&mut file).append_record(event).unwrap();
    }

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "when,what\r\n09:00,start\r\n09:05,\"stop, then restart\"\r\n"
    );
}

#[test]
fn test_rewrite_mixed_sample() {
    let table = CsvReader::new(File::open(sample_path("mixed.csv")).unwrap())
        .read_all()
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("test-writer.csv");
    let mut out = File::create(&out_path).unwrap();
    CsvWriter::new(&mut out).write_all(&table).unwrap();
    out.flush().unwrap();

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("id,name,notes,amount\r\n"));
    assert!(written.contains("2,\"Bob, Jr.\",\"said \"\"hi\"\"\",\r\n"));
    // The lone empty line comes back as an explicit empty field
    assert!(written.contains("\r\n\"\"\r\n"));

    let reread = CsvReader::new(File::open(&out_path).unwrap())
        .read_all()
        .unwrap();
    assert_eq!(reread, table);
}

#[test]
fn test_always_quote_wraps_every_field() {
    let table = vec![record(&["a", "", "b c"])];
    let bytes = write_table(&table, QuotePolicy::Always);
    assert_eq!(bytes, b"\"a\",\"\",\"b c\"\r\n");
}

// ========================================================================
// Round trips
// ========================================================================

#[test]
fn test_round_trip_quote_if_needed() {
    let table = awkward_table();
    assert_eq!(read_bytes(&write_table(&table, QuotePolicy::Necessary)), table);
}

#[test]
fn test_round_trip_always_quote() {
    let table = awkward_table();
    assert_eq!(read_bytes(&write_table(&table, QuotePolicy::Always)), table);
}

#[test]
fn test_round_trip_other_delimiters() {
    let table = awkward_table();
    for delimiter in [Delimiter::Tab, Delimiter::Pipe, Delimiter::Semicolon] {
        let mut writer = CsvWriter::new(Vec::new()).with_delimiter(delimiter);
        writer.write_all(&table).unwrap();
        let bytes = writer.into_inner();

        let read = CsvReader::new(bytes.as_slice())
            .with_delimiter(delimiter)
            .read_all()
            .unwrap();
        assert_eq!(read, table, "delimiter {:?}", delimiter);
    }
}

#[test]
fn test_round_trip_leading_byte_order_mark() {
    let table = vec![record(&["\u{feff}abc", "x"]), record(&["\u{feff}", "y"])];
    for policy in [QuotePolicy::Necessary, QuotePolicy::Always] {
        assert_eq!(read_bytes(&write_table(&table, policy)), table);
    }

    let single = vec![record(&["\u{feff}"])];
    assert_eq!(read_bytes(&write_table(&single, QuotePolicy::Necessary)), single);
}

#[test]
fn test_round_trip_quoted_comma() {
    let table = vec![record(&["hello, world"])];
    let read = read_bytes(&write_table(&table, QuotePolicy::Necessary));
    assert_eq!(read[0][0], "hello, world");
}

#[test]
fn test_round_trip_generated_fields() {
    // Every combination of two "hard" characters inside a field
    let parts = ["", "a", ",", "\"", "\n", "\r\n", "\r", " ", "é"];
    let mut table = Table::new();
    for first in parts {
        let row: Vec<String> = parts
            .iter()
            .map(|second| format!("{}{}", first, second))
            .collect();
        table.push(row);
    }

    for policy in [QuotePolicy::Necessary, QuotePolicy::Always] {
        assert_eq!(read_bytes(&write_table(&table, policy)), table);
    }
}
