//! Command-line argument parsing
//!
//! Supports:
//! - Inspecting a CSV file (summary, preview or JSON dump)
//! - Rewriting a CSV file with a different quoting policy or delimiter
//! - Appending a record to a CSV file
//! - Hex dumping any file
//! - Showing or creating the config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::csv::{Delimiter, QuotePolicy};
use crate::formats::CsvFormat;

/// Read, rewrite and append to CSV documents
#[derive(Parser, Debug)]
#[command(name = "docforms", version, about = "Read, rewrite and append to CSV documents")]
pub struct CliArgs {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the size and first rows of a CSV file
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print every record as JSON instead of a preview
        #[arg(long)]
        json: bool,

        /// Number of rows to preview
        #[arg(long, value_name = "N", default_value_t = 10)]
        rows: usize,

        /// Field delimiter: comma, tab, pipe or semicolon
        #[arg(short, long)]
        delimiter: Option<Delimiter>,
    },

    /// Read a CSV file and write it back out
    Rewrite {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (stdout if omitted). Its extension picks the delimiter
        /// unless one is given.
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Quoting: always or necessary
        #[arg(short, long)]
        quote: Option<QuotePolicy>,

        #[arg(short, long)]
        delimiter: Option<Delimiter>,
    },

    /// Append one record to a CSV file, creating it if missing
    Append {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field values of the record
        #[arg(value_name = "FIELD", required = true)]
        fields: Vec<String>,

        #[arg(short, long)]
        quote: Option<QuotePolicy>,

        #[arg(short, long)]
        delimiter: Option<Delimiter>,
    },

    /// Print a hex dump of any file
    Hexdump {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Bytes per line
        #[arg(short, long, value_name = "N")]
        columns: Option<usize>,
    },

    /// Print the effective configuration and where it is stored
    Config {
        /// Write the config file with the current settings if it does not exist
        #[arg(long)]
        init: bool,
    },
}

impl CliArgs {
    /// Console log level used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

impl Command {
    /// CSV settings for this command: flags win over the config file, and
    /// an unset delimiter is left for the file extension to decide
    pub fn csv_format(&self, config: &AppConfig) -> CsvFormat {
        let (delimiter, quote) = match self {
            Command::Inspect { delimiter, .. } => (*delimiter, None),
            Command::Rewrite {
                delimiter, quote, ..
            }
            | Command::Append {
                delimiter, quote, ..
            } => (*delimiter, *quote),
            Command::Hexdump { .. } | Command::Config { .. } => (None, None),
        };

        CsvFormat::new(
            delimiter.or(config.delimiter),
            quote.unwrap_or(config.quote_policy),
        )
    }
}
