//! Document formats
//!
//! Each format pairs a document type with the [`DocumentFormat`] that
//! creates, reads and writes it:
//!
//! | Format             | Document                 | New | Save |
//! |--------------------|--------------------------|-----|------|
//! | `CsvFormat`        | `CsvDocument`            | yes | yes  |
//! | `TextFormat`       | `PlainTextDocument`      | yes | yes  |
//! | `PropertiesFormat` | `JavaPropertiesDocument` | yes | yes  |
//! | `BinaryFormat`     | `BinaryDocument`         | no  | no   |
//!
//! [`DocumentFormat`]: crate::document::DocumentFormat

pub mod binary;
pub mod csv;
pub mod properties;
pub mod text;

pub use binary::{BinaryDocument, BinaryFormat, DEFAULT_HEX_COLUMNS};
pub use csv::{CsvDocument, CsvFormat};
pub use properties::{JavaPropertiesDocument, PropertiesFormat};
pub use text::{PlainTextDocument, TextFormat};
