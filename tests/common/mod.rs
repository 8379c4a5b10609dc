//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::PathBuf;

use docforms::csv::{Record, Table};

/// Path to a file under `samples/`
pub fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

/// Build a record from string slices
pub fn record(fields: &[&str]) -> Record {
    fields.iter().map(|f| f.to_string()).collect()
}

/// The records in `samples/mixed.csv`
pub fn mixed_table() -> Table {
    vec![
        record(&["id", "name", "notes", "amount"]),
        record(&["1", "Alice", "plain", "10.50"]),
        record(&["2", "Bob, Jr.", "said \"hi\"", ""]),
        record(&["3", "Chloé", "multi\r\nline note", "7"]),
        record(&["4", "", "", ""]),
        record(&[""]),
        record(&["5", "日本語", "tab\there"]),
        record(&["6", "", "last"]),
    ]
}

/// A table exercising every character the writer has to quote
pub fn awkward_table() -> Table {
    vec![
        record(&["", "", ""]),
        record(&[""]),
        record(&["comma,inside", "quote\"inside", "\"\"", "\"leading"]),
        record(&["lf\nonly", "crlf\r\npair", "cr\ronly", "trailing\n"]),
        record(&[" spaced ", "\ttabbed\t", "ünïcödé", "🦀"]),
        record(&["short"]),
        record(&["a", "b", "c", "d", "e", "f", "g"]),
    ]
}
