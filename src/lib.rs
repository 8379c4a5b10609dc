//! docforms - documents without the forms
//!
//! A strict CSV reader and policy-driven CSV writer, plus the document model
//! around them: document status tracking and a manager for the
//! new/load/save/close lifecycle of a single open document.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod csv;
pub mod document;
pub mod formats;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::AppConfig;
pub use csv::{CsvError, CsvReader, CsvWriter, Delimiter, ParseError, QuotePolicy, Record, Table};
pub use document::{Document, DocumentError, SingleDocumentManager};
