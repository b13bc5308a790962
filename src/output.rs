//! Durable destinations for extracted listings.

use crate::error::SinkError;
use crate::results::{ListingRecord, ResultBatch};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names, in record field order
///
/// Written without spaces after the commas so they match the
/// `#[serde(rename)]` names on `ListingRecord` when read back.
pub const HEADER: [&str; 4] = ["Title", "Mileage", "Year", "Price"];

/// Receives each page's records in the order they were extracted
pub trait RecordSink {
    /// Append one page's records
    fn append_records(&mut self, batch: &ResultBatch) -> Result<(), SinkError>;
}

/// Writes listings as CSV rows, quoting fields that contain commas or quotes
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    written: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) the output file and write the header
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let file = File::create(path.as_ref())?;
        ::log::info!("Writing listings to {}", path.as_ref().display());
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Write the header to `inner` and return a sink appending to it
    pub fn from_writer(inner: W) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self { writer, written: 0 })
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append_records(&mut self, batch: &ResultBatch) -> Result<(), SinkError> {
        for record in &batch.records {
            self.writer.write_record([
                &record.title,
                &record.mileage,
                &record.year,
                &record.price,
            ])?;
        }
        // Flush per page so a later failure keeps everything written so far
        self.writer.flush()?;
        self.written += batch.records.len();
        Ok(())
    }
}

/// Collects records in memory
impl RecordSink for Vec<ListingRecord> {
    fn append_records(&mut self, batch: &ResultBatch) -> Result<(), SinkError> {
        self.extend(batch.records.iter().cloned());
        Ok(())
    }
}
