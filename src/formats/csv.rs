//! CSV grid documents

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::csv::{CsvReader, CsvWriter, Delimiter, QuotePolicy, Record, Table};
use crate::document::{Document, DocumentError, DocumentFormat, DocumentStatus, DocumentType};

/// Extensions whose delimiter is fixed by [`Delimiter::from_extension`]
const CSV_EXTENSIONS: [&str; 3] = ["csv", "tsv", "psv"];

/// Bytes read when sniffing the delimiter of an unrecognised file
const SNIFF_LEN: u64 = 8 * 1024;

/// Rows and columns of a CSV file
///
/// Rows keep their original lengths; cells outside a short row read as
/// empty strings.
#[derive(Debug, Clone, Default)]
pub struct CsvDocument {
    status: DocumentStatus,
    rows: Table,
    /// Number of columns (max across all rows)
    column_count: usize,
}

impl CsvDocument {
    /// Create an empty, unnamed document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from parsed rows
    pub fn from_rows(rows: Table) -> Self {
        let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self {
            status: DocumentStatus::new(),
            rows,
            column_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Cell value, or an empty string outside the grid
    pub fn get_cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Set a cell, growing the grid with empty cells as needed
    ///
    /// Returns `true` and marks the document modified only if the value changed.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        if self.get_cell(row, col) == value {
            return false;
        }

        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            cells.resize_with(col + 1, String::new);
        }
        cells[col] = value.to_string();

        if col >= self.column_count {
            self.column_count = col + 1;
        }
        self.status.set_modified(true);
        true
    }

    /// Display width per column (in characters) over the first `sample_rows` rows
    pub fn column_widths(&self, sample_rows: usize) -> Vec<usize> {
        const MIN_WIDTH: usize = 4;
        const MAX_WIDTH: usize = 40;

        let mut widths = vec![MIN_WIDTH; self.column_count];

        for row in self.rows.iter().take(sample_rows) {
            for (col, cell) in row.iter().enumerate() {
                let cell_width = cell.chars().count();
                widths[col] = widths[col].max(cell_width).min(MAX_WIDTH);
            }
        }

        widths
    }

    /// The first `max_rows` rows as aligned text, cells separated by ` | `
    ///
    /// Line breaks inside cells are flattened and long cells are cut with `…`.
    pub fn preview_lines(&self, max_rows: usize) -> Vec<String> {
        let widths = self.column_widths(max_rows);
        self.rows
            .iter()
            .take(max_rows)
            .map(|row| {
                let cells: Vec<String> = widths
                    .iter()
                    .enumerate()
                    .map(|(col, &width)| fit_cell(row.get(col).map_or("", String::as_str), width))
                    .collect();
                cells.join(" | ").trim_end().to_string()
            })
            .collect()
    }
}

fn fit_cell(cell: &str, width: usize) -> String {
    let flat: String = cell
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    let len = flat.chars().count();
    if len > width {
        let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", flat, " ".repeat(width - len))
    }
}

impl Document for CsvDocument {
    fn status(&self) -> &DocumentStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut DocumentStatus {
        &mut self.status
    }
}

/// Reads and writes [`CsvDocument`]s
///
/// Without an explicit delimiter the file extension decides (`.tsv` is tab
/// separated, `.psv` pipe separated, anything else comma separated).
#[derive(Debug, Clone, Default)]
pub struct CsvFormat {
    pub delimiter: Option<Delimiter>,
    pub quote_policy: QuotePolicy,
}

impl CsvFormat {
    pub fn new(delimiter: Option<Delimiter>, quote_policy: QuotePolicy) -> Self {
        Self {
            delimiter,
            quote_policy,
        }
    }

    pub fn delimiter_for(&self, path: &Path) -> Delimiter {
        self.delimiter.unwrap_or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(Delimiter::from_extension)
                .unwrap_or_default()
        })
    }

    /// Like [`delimiter_for`](Self::delimiter_for), but a file whose
    /// extension is not one of the known CSV extensions has its first few
    /// lines sniffed instead
    pub fn delimiter_for_reading(&self, path: &Path) -> io::Result<Delimiter> {
        let known_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| CSV_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if self.delimiter.is_some() || known_extension {
            return Ok(self.delimiter_for(path));
        }

        let mut head = Vec::new();
        File::open(path)?
            .take(SNIFF_LEN)
            .read_to_end(&mut head)?;
        let detected = Delimiter::detect(&String::from_utf8_lossy(&head));
        tracing::debug!(path = %path.display(), ?detected, "Sniffed CSV delimiter");
        Ok(detected)
    }
}

impl DocumentFormat for CsvFormat {
    type Document = CsvDocument;

    fn document_type(&self) -> DocumentType {
        DocumentType::new("CSV", "*.csv;*.tsv;*.psv")
    }

    fn default_name(&self) -> &str {
        "CsvDocument"
    }

    fn default_extension(&self) -> &str {
        "csv"
    }

    fn create(&self) -> Result<CsvDocument, DocumentError> {
        Ok(CsvDocument::new())
    }

    fn read(&self, path: &Path) -> Result<CsvDocument, DocumentError> {
        let delimiter = self.delimiter_for_reading(path)?;
        let file = File::open(path)?;
        let rows = CsvReader::new(file).with_delimiter(delimiter).read_all()?;
        tracing::debug!(
            path = %path.display(),
            rows = rows.len(),
            ?delimiter,
            "Parsed CSV document"
        );
        Ok(CsvDocument::from_rows(rows))
    }

    fn write(&self, document: &CsvDocument, path: &Path) -> Result<(), DocumentError> {
        // File::create truncates any previous, longer contents
        let mut out = BufWriter::new(File::create(path)?);
        CsvWriter::new(&mut out)
            .with_delimiter(self.delimiter_for(path))
            .with_quote_policy(self.quote_policy)
            .write_all(document.rows())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsvDocument {
        CsvDocument::from_rows(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["1".into(), "2".into()],
        ])
    }

    #[test]
    fn test_dimensions() {
        let doc = sample();
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.column_count(), 3);
        assert!(!doc.is_empty());
        assert!(CsvDocument::new().is_empty());
    }

    #[test]
    fn test_get_cell_outside_grid() {
        let doc = sample();
        assert_eq!(doc.get_cell(0, 2), "c");
        assert_eq!(doc.get_cell(1, 2), "");
        assert_eq!(doc.get_cell(9, 9), "");
    }

    #[test]
    fn test_set_cell_same_value_is_not_a_change() {
        let mut doc = sample();
        assert!(!doc.set_cell(0, 0, "a"));
        assert!(!doc.set_cell(5, 5, ""));
        assert!(!doc.is_modified());
        assert_eq!(doc.row_count(), 2);
    }

    #[test]
    fn test_set_cell_grows_grid() {
        let mut doc = sample();
        assert!(doc.set_cell(3, 4, "x"));
        assert!(doc.is_modified());
        assert_eq!(doc.row_count(), 4);
        assert_eq!(doc.column_count(), 5);
        assert_eq!(doc.get_cell(3, 4), "x");
        assert_eq!(doc.rows()[2].len(), 0);
        assert_eq!(doc.rows()[3].len(), 5);
    }

    #[test]
    fn test_column_widths() {
        let doc = CsvDocument::from_rows(vec![
            vec!["id".into(), "a much longer header".into()],
            vec!["12345".into()],
        ]);
        assert_eq!(doc.column_widths(100), vec![5, 20]);
        assert_eq!(doc.column_widths(1), vec![4, 20]);
    }

    #[test]
    fn test_preview_lines() {
        let doc = CsvDocument::from_rows(vec![
            vec!["id".into(), "name".into()],
            vec!["1".into(), "Ada Lovelace".into()],
            vec!["2".into()],
        ]);
        assert_eq!(
            doc.preview_lines(10),
            vec!["id   | name", "1    | Ada Lovelace", "2"]
        );
        assert_eq!(doc.preview_lines(1), vec!["id   | name"]);
    }

    #[test]
    fn test_preview_cuts_long_cells() {
        let long = "x".repeat(60);
        let doc = CsvDocument::from_rows(vec![vec![long, "two\nlines".into()]]);
        let line = &doc.preview_lines(5)[0];
        assert!(line.starts_with(&format!("{}…", "x".repeat(39))));
        assert!(line.ends_with("two lines"));
    }

    #[test]
    fn test_delimiter_for_extension() {
        let format = CsvFormat::default();
        assert_eq!(format.delimiter_for(Path::new("a.tsv")), Delimiter::Tab);
        assert_eq!(format.delimiter_for(Path::new("a.csv")), Delimiter::Comma);
        assert_eq!(format.delimiter_for(Path::new("noext")), Delimiter::Comma);

        let format = CsvFormat::new(Some(Delimiter::Semicolon), QuotePolicy::Always);
        assert_eq!(format.delimiter_for(Path::new("a.tsv")), Delimiter::Semicolon);
    }

    #[test]
    fn test_unknown_extension_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.dat");
        std::fs::write(&path, "a;b;c\r\n1;2;3\r\n").unwrap();

        let format = CsvFormat::default();
        assert_eq!(format.delimiter_for_reading(&path).unwrap(), Delimiter::Semicolon);
        assert_eq!(format.read(&path).unwrap().column_count(), 3);

        let csv = dir.path().join("export.csv");
        std::fs::write(&csv, "a;b;c\r\n").unwrap();
        assert_eq!(format.delimiter_for_reading(&csv).unwrap(), Delimiter::Comma);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        let format = CsvFormat::default();

        let mut doc = sample();
        doc.set_cell(1, 0, "with, comma");
        format.write(&doc, &path).unwrap();

        let read = format.read(&path).unwrap();
        assert_eq!(read.rows(), doc.rows());
        assert!(!read.is_modified());
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        std::fs::write(&path, "a very long line that should disappear\r\n".repeat(10)).unwrap();

        let doc = CsvDocument::from_rows(vec![vec!["x".into()]]);
        CsvFormat::default().write(&doc, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\r\n");
    }
}
