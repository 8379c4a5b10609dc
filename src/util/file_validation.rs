//! Checks run on a path before any document format reads it

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Largest file a document may be loaded from (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// How many leading bytes are sniffed for NUL when guessing binary content
const BINARY_SNIFF_LEN: usize = 8 * 1024;

const MB: f64 = 1024.0 * 1024.0;

/// Why a path cannot be loaded as a document
#[derive(Debug, Clone, PartialEq)]
pub enum FileOpenError {
    NotFound,
    PermissionDenied,
    IsDirectory,
    /// A NUL byte turned up where text was expected
    BinaryFile,
    TooLarge { bytes: u64 },
    Io(String),
}

impl FileOpenError {
    fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err.to_string()),
        }
    }

    /// Full sentence naming the file, for the command line
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot open directory: {}", filename),
            Self::BinaryFile => format!("Cannot open binary file as text: {}", filename),
            Self::TooLarge { bytes } => format!(
                "{} is too large ({:.1} MB, limit {:.0} MB)",
                filename,
                *bytes as f64 / MB,
                MAX_FILE_SIZE as f64 / MB
            ),
            Self::Io(msg) => format!("Error opening {}: {}", filename, msg),
        }
    }
}

impl fmt::Display for FileOpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("file not found"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::IsDirectory => f.write_str("is a directory"),
            Self::BinaryFile => f.write_str("binary file"),
            Self::TooLarge { bytes } => write!(f, "file too large ({:.1} MB)", *bytes as f64 / MB),
            Self::Io(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for FileOpenError {}

/// Require `path` to be an existing regular file no larger than [`MAX_FILE_SIZE`]
///
/// Content is not inspected; text formats call [`is_likely_binary`] themselves.
pub fn validate_file_for_opening(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(FileOpenError::from_io)?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }
    if metadata.len() > MAX_FILE_SIZE {
        tracing::debug!(path = %path.display(), bytes = metadata.len(), "Rejected oversized file");
        return Err(FileOpenError::TooLarge {
            bytes: metadata.len(),
        });
    }
    Ok(())
}

/// Whether the first few KB of the file contain a NUL byte
///
/// Unreadable files count as text so the real open reports the error.
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut head = Vec::with_capacity(BINARY_SNIFF_LEN);
    match file.take(BINARY_SNIFF_LEN as u64).read_to_end(&mut head) {
        Ok(_) => head.contains(&0),
        Err(_) => false,
    }
}

/// The last path component, or the whole path when there is none
pub fn filename_for_display(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file() {
        assert_eq!(
            validate_file_for_opening(Path::new("/nonexistent/path/file.csv")),
            Err(FileOpenError::NotFound)
        );
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            validate_file_for_opening(dir.path()),
            Err(FileOpenError::IsDirectory)
        );
    }

    #[test]
    fn test_empty_file_accepted() {
        let temp = NamedTempFile::new().unwrap();
        assert!(validate_file_for_opening(temp.path()).is_ok());
    }

    #[test]
    fn test_csv_is_not_binary() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"name,value\r\nalpha,1\r\n").unwrap();
        temp.flush().unwrap();
        assert!(!is_likely_binary(temp.path()));
    }

    #[test]
    fn test_nul_byte_means_binary() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"a,b\r\n\x00\x01").unwrap();
        temp.flush().unwrap();
        assert!(is_likely_binary(temp.path()));
    }

    #[test]
    fn test_nul_past_sniff_window_is_ignored() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&vec![b'x'; BINARY_SNIFF_LEN]).unwrap();
        temp.write_all(b"\x00").unwrap();
        temp.flush().unwrap();
        assert!(!is_likely_binary(temp.path()));
    }

    #[test]
    fn test_unreadable_counts_as_text() {
        assert!(!is_likely_binary(Path::new("/nonexistent/file.bin")));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            FileOpenError::IsDirectory.user_message("exports"),
            "Cannot open directory: exports"
        );
        assert_eq!(
            FileOpenError::BinaryFile.user_message("photo.png"),
            "Cannot open binary file as text: photo.png"
        );
        assert_eq!(
            FileOpenError::TooLarge {
                bytes: 60 * 1024 * 1024
            }
            .user_message("huge.csv"),
            "huge.csv is too large (60.0 MB, limit 50 MB)"
        );
    }

    #[test]
    fn test_filename_for_display() {
        assert_eq!(filename_for_display(Path::new("/data/people.csv")), "people.csv");
        assert_eq!(filename_for_display(Path::new("/")), "/");
    }
}
