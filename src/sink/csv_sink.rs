//! Append-only CSV sink
//!
//! The header row is derived from the record type's field names and written
//! only when a destination file is created; later appends add rows with no
//! header duplication. Callers must keep a stable field set per destination;
//! that contract is documented, not enforced at runtime.

use crate::sink::{SinkError, SinkResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Append-only persistence of records to CSV files under one root directory
#[derive(Debug, Clone)]
pub struct CsvSink {
    root: PathBuf,
}

impl CsvSink {
    /// Creates a sink rooted at the given directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> SinkResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the on-disk path for a destination key
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.root.join(destination)
    }

    /// Appends records to a destination
    ///
    /// Fails with [`SinkError::EmptyBatch`] when `records` is empty, before any
    /// I/O happens. Write failures surface as [`SinkError::Persist`] and are
    /// never retried; durability failures are not transient by assumption.
    ///
    /// # Arguments
    ///
    /// * `records` - The records to append; all must share one field set
    /// * `destination` - Destination filename relative to the sink root
    pub fn append<T: Serialize>(&self, records: &[T], destination: &str) -> SinkResult<()> {
        if records.is_empty() {
            return Err(SinkError::EmptyBatch {
                destination: destination.to_string(),
            });
        }

        let path = self.path_for(destination);
        let write_header = !has_content(&path);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        for record in records {
            writer.serialize(record).map_err(|source| SinkError::Persist {
                destination: destination.to_string(),
                source,
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Reads all records back from a destination
    ///
    /// Used by the scrape stage to re-read the crawl stage's output, which
    /// keeps the two stages independent across process restarts.
    pub fn read_records<T: DeserializeOwned>(&self, destination: &str) -> SinkResult<Vec<T>> {
        let path = self.path_for(destination);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| SinkError::Read {
                destination: destination.to_string(),
                source,
            })?;

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record = result.map_err(|source| SinkError::Read {
                destination: destination.to_string(),
                source,
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

/// True when the destination already holds data (header included)
fn has_content(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
