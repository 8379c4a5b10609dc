//! Errors from document lifecycle operations

use std::fmt;
use std::io;

use crate::csv::CsvError;
use crate::formats::properties::PropertiesError;
use crate::util::FileOpenError;

#[derive(Debug)]
pub enum DocumentError {
    /// The operation needs an open document and there is none
    NoDocument,
    /// The document has never been saved, so it has no file to save to
    NeedsFilename,
    /// The document format does not support this operation
    Unsupported { operation: &'static str },
    /// The file failed validation before loading
    Open(FileOpenError),
    Io(io::Error),
    Csv(CsvError),
    Properties(PropertiesError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => write!(f, "no document is open"),
            Self::NeedsFilename => {
                write!(f, "document has not been saved yet; a filename is required")
            }
            Self::Unsupported { operation } => {
                write!(f, "'{}' is not supported for this document type", operation)
            }
            Self::Open(e) => write!(f, "cannot open file: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Csv(e) => write!(f, "{}", e),
            Self::Properties(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            Self::Properties(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FileOpenError> for DocumentError {
    fn from(e: FileOpenError) -> Self {
        Self::Open(e)
    }
}

impl From<io::Error> for DocumentError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CsvError> for DocumentError {
    fn from(e: CsvError) -> Self {
        Self::Csv(e)
    }
}

impl From<PropertiesError> for DocumentError {
    fn from(e: PropertiesError) -> Self {
        Self::Properties(e)
    }
}
