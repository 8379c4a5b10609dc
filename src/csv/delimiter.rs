//! Field delimiters supported by the reader and writer

use serde::{Deserialize, Serialize};

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// The delimiter as a single byte (all delimiters are ASCII)
    pub fn byte(self) -> u8 {
        self.char() as u8
    }

    /// Detect delimiter from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "tsv" => Delimiter::Tab,
            "psv" => Delimiter::Pipe,
            _ => Delimiter::Comma,
        }
    }

    /// Detect delimiter by counting candidates in the first few lines
    ///
    /// Ties resolve in the order Tab, Pipe, Semicolon, Comma. Content without
    /// any candidate is treated as comma separated.
    pub fn detect(content: &str) -> Self {
        let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

        let comma_count = first_lines.matches(',').count();
        let tab_count = first_lines.matches('\t').count();
        let pipe_count = first_lines.matches('|').count();
        let semi_count = first_lines.matches(';').count();

        let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

        if max == 0 {
            return Delimiter::Comma;
        }

        if tab_count == max {
            Delimiter::Tab
        } else if pipe_count == max {
            Delimiter::Pipe
        } else if semi_count == max {
            Delimiter::Semicolon
        } else {
            Delimiter::Comma
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "tab" | "\\t" | "\t" => Ok(Delimiter::Tab),
            "pipe" | "|" => Ok(Delimiter::Pipe),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            other => Err(format!("unknown delimiter '{}'", other)),
        }
    }
}
