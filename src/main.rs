use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use docforms::cli::{CliArgs, Command};
use docforms::config::AppConfig;
use docforms::config_paths;
use docforms::csv::CsvWriter;
use docforms::document::{Document, DocumentError, DocumentFormat, SingleDocumentManager};
use docforms::formats::{BinaryFormat, CsvFormat};
use docforms::util::filename_for_display;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    docforms::tracing::init(args.log_level());

    let config = AppConfig::load();
    let format = args.command.csv_format(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Inspect { file, json, rows, .. } => inspect(&file, format, json, rows, &mut out),
        Command::Rewrite { input, output, .. } => {
            rewrite(&input, output.as_deref(), format, &mut out)
        }
        Command::Append { file, fields, .. } => append(&file, &fields, format),
        Command::Hexdump { file, columns } => {
            hexdump(&file, columns.unwrap_or(config.hex_columns), &mut out)
        }
        Command::Config { init } => show_config(&config, init, &mut out),
    }
}

/// Validation failures get the plain user message, everything else keeps its cause
fn load_error(path: &Path, err: DocumentError) -> anyhow::Error {
    match err {
        DocumentError::Open(e) => anyhow!(e.user_message(&filename_for_display(path))),
        other => anyhow::Error::new(other).context(format!("Failed to load {}", path.display())),
    }
}

fn inspect(
    path: &Path,
    format: CsvFormat,
    json: bool,
    rows: usize,
    out: &mut impl Write,
) -> Result<()> {
    let document_type = format.document_type();
    if !document_type.matches(path) {
        tracing::warn!(
            "{} does not look like a {} file ({})",
            path.display(),
            document_type.name(),
            document_type.pattern()
        );
    }

    let mut manager = SingleDocumentManager::new(format);
    let document = manager.load(path).map_err(|e| load_error(path, e))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, document.rows())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{}: {} rows, {} columns",
        document.name().unwrap_or_default(),
        document.row_count(),
        document.column_count()
    )?;
    for line in document.preview_lines(rows) {
        writeln!(out, "{}", line)?;
    }
    if document.row_count() > rows {
        writeln!(out, "… {} more rows", document.row_count() - rows)?;
    }
    Ok(())
}

fn rewrite(
    input: &Path,
    output: Option<&Path>,
    format: CsvFormat,
    out: &mut impl Write,
) -> Result<()> {
    let mut manager = SingleDocumentManager::new(format);
    manager.load(input).map_err(|e| load_error(input, e))?;

    match output {
        Some(target) => {
            manager
                .save_as(target)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            tracing::info!("Rewrote {} as {}", input.display(), target.display());
        }
        None => {
            let format = manager.format();
            let rows = manager.document().map(|d| d.rows()).unwrap_or_default();
            CsvWriter::new(&mut *out)
                .with_delimiter(format.delimiter_for_reading(input)?)
                .with_quote_policy(format.quote_policy)
                .write_all(rows)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn append(path: &Path, fields: &[String], format: CsvFormat) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;

    CsvWriter::new(&mut file)
        .with_delimiter(format.delimiter_for(path))
        .with_quote_policy(format.quote_policy)
        .append_record(fields)
        .with_context(|| format!("Failed to append to {}", path.display()))?;
    file.flush()?;

    tracing::info!("Appended {} fields to {}", fields.len(), path.display());
    Ok(())
}

fn hexdump(path: &Path, columns: usize, out: &mut impl Write) -> Result<()> {
    let mut manager = SingleDocumentManager::new(BinaryFormat);
    let document = manager.load(path).map_err(|e| load_error(path, e))?;
    write!(out, "{}", document.hex_dump(columns))?;
    Ok(())
}

fn show_config(config: &AppConfig, init: bool, out: &mut impl Write) -> Result<()> {
    let path = config_paths::config_file().context("No config directory available")?;

    if init {
        if path.exists() {
            writeln!(out, "Config already exists at {}", path.display())?;
        } else {
            config.save().map_err(|e| anyhow!(e))?;
            writeln!(out, "Wrote {}", path.display())?;
        }
        return Ok(());
    }

    writeln!(out, "# {}", path.display())?;
    write!(out, "{}", serde_yaml::to_string(config)?)?;
    Ok(())
}
