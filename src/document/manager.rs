//! Lifecycle of a single open document
//!
//! The manager owns at most one document and tracks where it lives on disk:
//!
//! ```text
//!            new_document            edit
//! Closed ─────────────────► New ──────────────► Modified
//!   ▲  │ load                │ save_as              │ save / save_as
//!   │  └────────────► Clean ◄┴──────────────────────┘
//!   └──────── close ◄── (any state)
//! ```
//!
//! Creating, reading and writing the document itself is delegated to a
//! [`DocumentFormat`].

use std::path::{Path, PathBuf};

use super::document_type::DocumentType;
use super::error::DocumentError;
use super::status::Document;
use crate::util::{filename_for_display, validate_file_for_opening};

/// Base name for new documents when a format does not choose one
pub const DEFAULT_DOCUMENT_NAME: &str = "Document";

/// Creates, reads and writes one kind of document
pub trait DocumentFormat {
    type Document: Document;

    fn document_type(&self) -> DocumentType;

    /// Base name for new documents, e.g. `"Text Document"`
    fn default_name(&self) -> &str {
        DEFAULT_DOCUMENT_NAME
    }

    /// Extension (without the dot) for new documents
    fn default_extension(&self) -> &str;

    /// A new, empty document
    fn create(&self) -> Result<Self::Document, DocumentError> {
        Err(DocumentError::Unsupported { operation: "new" })
    }

    fn read(&self, path: &Path) -> Result<Self::Document, DocumentError>;

    fn write(&self, _document: &Self::Document, _path: &Path) -> Result<(), DocumentError> {
        Err(DocumentError::Unsupported { operation: "save" })
    }
}

/// Where the managed document stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No document
    Closed,
    /// Created but never saved, and unmodified since
    New,
    /// Matches the file on disk
    Clean,
    /// Has unsaved changes
    Modified,
}

/// Manages the lifecycle of one document at a time
pub struct SingleDocumentManager<F: DocumentFormat> {
    format: F,
    document: Option<F::Document>,
    filename: Option<PathBuf>,
    new_file: bool,
    /// Documents created so far, used to number default names
    doc_count: usize,
}

impl<F: DocumentFormat> SingleDocumentManager<F> {
    pub fn new(format: F) -> Self {
        Self {
            format,
            document: None,
            filename: None,
            new_file: false,
            doc_count: 0,
        }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn document(&self) -> Option<&F::Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut F::Document> {
        self.document.as_mut()
    }

    /// Path of the current document; for new documents this is the default name
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn is_opened(&self) -> bool {
        self.document.is_some()
    }

    /// True if the current document exists and has never been saved
    pub fn is_new_file(&self) -> bool {
        self.is_opened() && self.new_file
    }

    pub fn is_modified(&self) -> bool {
        self.document.as_ref().is_some_and(|d| d.is_modified())
    }

    pub fn state(&self) -> DocumentState {
        match &self.document {
            None => DocumentState::Closed,
            Some(doc) if doc.is_modified() => DocumentState::Modified,
            Some(_) if self.new_file => DocumentState::New,
            Some(_) => DocumentState::Clean,
        }
    }

    /// Replace the current document with a new, empty one
    ///
    /// New documents are named `"{default_name}{n}.{default_extension}"` with
    /// `n` counting up from 1 for each document this manager creates.
    pub fn new_document(&mut self) -> Result<&mut F::Document, DocumentError> {
        let mut document = self.format.create()?;

        self.doc_count += 1;
        let name = format!(
            "{}{}.{}",
            self.format.default_name(),
            self.doc_count,
            self.format.default_extension()
        );

        let status = document.status_mut();
        status.set_name(name.clone());
        status.set_modified(false);

        tracing::info!("Created new document {}", name);
        self.filename = Some(PathBuf::from(name));
        self.new_file = true;
        Ok(self.document.insert(document))
    }

    /// Load `path`, replacing the current document
    ///
    /// On failure the current document is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<&mut F::Document, DocumentError> {
        validate_file_for_opening(path)?;
        let mut document = self.format.read(path)?;

        let status = document.status_mut();
        status.set_name(filename_for_display(path));
        status.set_modified(false);

        tracing::info!("Loaded {}", path.display());
        self.filename = Some(path.to_path_buf());
        self.new_file = false;
        Ok(self.document.insert(document))
    }

    /// Save to `path` and adopt it as the document's file
    pub fn save_as(&mut self, path: &Path) -> Result<(), DocumentError> {
        let document = self.document.as_mut().ok_or(DocumentError::NoDocument)?;
        self.format.write(document, path)?;

        let status = document.status_mut();
        status.set_name(filename_for_display(path));
        status.set_modified(false);

        tracing::info!("Saved {}", path.display());
        self.filename = Some(path.to_path_buf());
        self.new_file = false;
        Ok(())
    }

    /// Save to the file the document was loaded from or last saved to
    pub fn save(&mut self) -> Result<(), DocumentError> {
        if !self.is_opened() {
            return Err(DocumentError::NoDocument);
        }
        if self.new_file {
            return Err(DocumentError::NeedsFilename);
        }
        let path = self.filename.clone().ok_or(DocumentError::NeedsFilename)?;
        self.save_as(&path)
    }

    /// Close the current document, returning it if there was one
    ///
    /// Unsaved changes are discarded; check [`is_modified`](Self::is_modified) first.
    pub fn close(&mut self) -> Option<F::Document> {
        let document = self.document.take();
        if let Some(doc) = &document {
            tracing::debug!(
                name = doc.name().unwrap_or_default(),
                modified = doc.is_modified(),
                "Closed document"
            );
        }
        self.filename = None;
        self.new_file = false;
        document
    }
}
