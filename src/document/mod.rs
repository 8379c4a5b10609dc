//! Document model
//!
//! ```text
//! SingleDocumentManager<F: DocumentFormat>
//! ├── F::Document: Document ── DocumentStatus (name, modified)
//! ├── filename / new-file flag
//! └── F ── create / read / write, DocumentType
//! ```

mod document_type;
mod error;
mod manager;
mod status;

pub use document_type::DocumentType;
pub use error::DocumentError;
pub use manager::{DocumentFormat, DocumentState, SingleDocumentManager, DEFAULT_DOCUMENT_NAME};
pub use status::{Document, DocumentStatus};
