//! Delimited file output.
//!
//! Rows are written unquoted, `;`-separated, one per line, as a single blob
//! into a timestamped file. The payload column is raw JSON, so the indexer
//! splits on the first three delimiters only.

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::{Clock, SystemClock};
use crate::error::{ExportError, Result};
use crate::row::ExportRow;

/// Field separator.
pub const DELIMITER: u8 = b';';

/// Decides where a batch written at `now` lands.
pub trait OutputPathResolver: Send + Sync {
    fn resolve(&self, now: DateTime<Utc>) -> PathBuf;
}

/// `<dir>/output-<YYYY-MM-DDTHH-MM-SS>.csv`
#[derive(Debug, Clone)]
pub struct TimestampedPath {
    dir: PathBuf,
}

impl TimestampedPath {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputPathResolver for TimestampedPath {
    fn resolve(&self, now: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("output-{}.csv", now.format("%Y-%m-%dT%H-%M-%S")))
    }
}

/// Render rows into the on-disk byte format: rows joined by `\n`, no
/// trailing terminator.
pub fn render_rows(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row.fields())?;
    }

    let mut blob = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    if !rows.is_empty() {
        blob.pop();
    }
    Ok(blob)
}

/// Writes each batch to a fresh file chosen by the resolver.
#[derive(Debug, Clone)]
pub struct CsvFileSink<C = SystemClock, P = TimestampedPath> {
    clock: C,
    resolver: P,
}

impl<C: Clock, P: OutputPathResolver> CsvFileSink<C, P> {
    pub fn new(clock: C, resolver: P) -> Self {
        Self { clock, resolver }
    }

    /// Write `rows`, creating the parent directory if needed. Returns the file path.
    pub fn write(&self, rows: &[ExportRow]) -> Result<PathBuf> {
        let path = self.resolver.resolve(self.clock.now());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let blob = render_rows(rows)?;
        fs::write(&path, blob)?;

        tracing::info!("{} attestations saved to {}", rows.len(), path.display());
        Ok(path)
    }
}

impl CsvFileSink {
    /// Wall clock, timestamped files under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(SystemClock, TimestampedPath::new(dir))
    }
}
