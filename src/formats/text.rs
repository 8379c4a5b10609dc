//! Plain text documents

use std::fs;
use std::path::Path;

use ropey::Rope;

use crate::document::{Document, DocumentError, DocumentFormat, DocumentStatus, DocumentType};
use crate::util::{is_likely_binary, FileOpenError};

/// A text buffer with document status
#[derive(Debug, Clone, Default)]
pub struct PlainTextDocument {
    status: DocumentStatus,
    buffer: Rope,
}

impl PlainTextDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text`, unmodified
    pub fn with_text(text: &str) -> Self {
        Self {
            status: DocumentStatus::new(),
            buffer: Rope::from_str(text),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    /// Replace the whole text; always marks the document modified
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
        self.status.set_modified(true);
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }
}

impl Document for PlainTextDocument {
    fn status(&self) -> &DocumentStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut DocumentStatus {
        &mut self.status
    }
}

/// Reads and writes UTF-8 text files
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl DocumentFormat for TextFormat {
    type Document = PlainTextDocument;

    fn document_type(&self) -> DocumentType {
        DocumentType::new("Text", "*.txt")
    }

    fn default_name(&self) -> &str {
        "Text Document"
    }

    fn default_extension(&self) -> &str {
        "txt"
    }

    fn create(&self) -> Result<PlainTextDocument, DocumentError> {
        Ok(PlainTextDocument::new())
    }

    fn read(&self, path: &Path) -> Result<PlainTextDocument, DocumentError> {
        if is_likely_binary(path) {
            return Err(FileOpenError::BinaryFile.into());
        }
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read text document");
        Ok(PlainTextDocument::with_text(&content))
    }

    fn write(&self, document: &PlainTextDocument, path: &Path) -> Result<(), DocumentError> {
        let mut file = fs::File::create(path)?;
        document.buffer.write_to(&mut file)?;
        Ok(())
    }
}
