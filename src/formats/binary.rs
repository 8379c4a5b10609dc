//! Read-only binary documents and hex dumps

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::document::{Document, DocumentError, DocumentFormat, DocumentStatus, DocumentType};

/// Bytes per hex dump line unless configured otherwise
pub const DEFAULT_HEX_COLUMNS: usize = 16;

/// Raw file contents for viewing
#[derive(Debug, Clone)]
pub struct BinaryDocument {
    status: DocumentStatus,
    data: Vec<u8>,
}

impl Default for BinaryDocument {
    /// A placeholder holding a single zero byte
    fn default() -> Self {
        Self::from_bytes(vec![0])
    }
}

impl BinaryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            status: DocumentStatus::new(),
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Render as lines of `OFFSET  XX XX ..  chars`
    ///
    /// Offsets are six hex digits. The last line is padded so the character
    /// column stays aligned; non-printable bytes show as `.`.
    pub fn hex_lines(&self, columns: usize) -> Vec<String> {
        let columns = columns.max(1);
        self.data
            .chunks(columns)
            .enumerate()
            .map(|(i, chunk)| {
                let mut line = format!("{:06X} ", i * columns);
                for byte in chunk {
                    let _ = write!(line, " {:02X}", byte);
                }
                for _ in chunk.len()..columns {
                    line.push_str("   ");
                }
                line.push_str("  ");
                line.extend(chunk.iter().map(|&b| printable(b)));
                line
            })
            .collect()
    }

    pub fn hex_dump(&self, columns: usize) -> String {
        let mut out = String::new();
        for line in self.hex_lines(columns) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

impl Document for BinaryDocument {
    fn status(&self) -> &DocumentStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut DocumentStatus {
        &mut self.status
    }
}

/// Loads any file as bytes; new and save are not supported
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl DocumentFormat for BinaryFormat {
    type Document = BinaryDocument;

    fn document_type(&self) -> DocumentType {
        DocumentType::new("All", "*")
    }

    fn default_extension(&self) -> &str {
        "bin"
    }

    fn read(&self, path: &Path) -> Result<BinaryDocument, DocumentError> {
        let data = fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Read binary document");
        Ok(BinaryDocument::from_bytes(data))
    }
}
