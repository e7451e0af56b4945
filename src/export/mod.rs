//! CSV export of catalog records.
//!
//! The header row is written when the exporter is opened, so the artifact is
//! well-formed even if the crawl finds nothing. Rows are buffered by the CSV
//! writer; call [`Exporter::finish`] to flush. Dropping an unfinished
//! exporter still flushes, but swallows any I/O error.

use crate::catalog::Record;
use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

/// Fixed header row.
pub const HEADER: [&str; 2] = ["Title", "Price"];

/// Streaming two-column CSV writer.
pub struct Exporter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl Exporter<File> {
    /// Creates (or truncates) the output file and writes the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Creating output file: {}", path.display());

        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        Self::from_writer(file)
    }
}

impl<W: Write> Exporter<W> {
    /// Wraps any writer and writes the header.
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);

        writer.write_record(HEADER).context("Failed to write CSV header")?;

        Ok(Self { writer, rows: 0 })
    }

    /// Appends one record as a row.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        self.writer.serialize(record).context("Failed to write CSV row")?;
        self.rows += 1;
        trace!("Wrote row {}", self.rows);
        Ok(())
    }

    /// Number of data rows written so far (header excluded).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes buffered rows and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        let rows = self.rows;
        let mut inner = self
            .writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV output: {}", e.error()))?;
        inner.flush().context("Failed to flush CSV output")?;

        debug!("Export finished with {} rows", rows);
        Ok(inner)
    }
}
