//! CSV dataset sink.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use csv::{QuoteStyle, Writer, WriterBuilder};

use crate::error::Result;
use crate::item::MatchedItem;
use crate::output::{DatasetRow, OutputSink, DATASET_COLUMNS};

/// Writes matched items to a CSV dataset, flushing after every batch.
#[derive(Debug)]
pub struct CsvOutputSink {
    path: PathBuf,
    writer: Mutex<Writer<File>>,
}

impl CsvOutputSink {
    /// Starts a fresh dataset at `path`, replacing any previous one.
    ///
    /// The header is written immediately, so a run without matches still
    /// leaves a well-formed empty dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;
        let file = File::create(path)?;
        let sink = Self::from_file(path, file);
        sink.write_header()?;
        log::debug!("reset output dataset {}", path.display());
        Ok(sink)
    }

    /// Appends to the dataset at `path`, writing the header only if the
    /// file is new or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be opened.
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;
        let is_new = fs::metadata(path).map_or(true, |m| m.len() == 0);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let sink = Self::from_file(path, file);
        if is_new {
            sink.write_header()?;
        }
        Ok(sink)
    }

    /// Location of the dataset.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
            _ => Ok(()),
        }
    }

    fn from_file(path: &Path, file: File) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .from_writer(file);
        Self {
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
        }
    }

    fn write_header(&self) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_record(DATASET_COLUMNS)?;
        writer.flush()?;
        Ok(())
    }
}

impl OutputSink for CsvOutputSink {
    fn append_matched_items(&self, items: &[MatchedItem]) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        for item in items {
            writer.serialize(DatasetRow::from(item))?;
        }
        writer.flush()?;
        log::debug!("appended {} items to {}", items.len(), self.path.display());
        Ok(())
    }
}
