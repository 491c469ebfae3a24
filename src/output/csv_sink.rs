//! CSV output sink
//!
//! One `URL` column, one row per successfully fetched page, appended as the
//! crawl proceeds so the file can be read mid-crawl.

use crate::output::{OutputResult, OutputSink};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Header row of the output file
pub const OUTPUT_HEADER: &str = "URL";

/// Append-only CSV writer shared by every worker
pub struct CsvSink {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Opens the output file in append mode
    ///
    /// The header is written only when the file is new or empty, so a
    /// resumed crawl keeps appending under the existing header.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if size == 0 {
            writer.write_record([OUTPUT_HEADER])?;
            writer.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
        })
    }
}

impl OutputSink for CsvSink {
    fn append(&self, url: &str) -> OutputResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_record([url])?;
        writer.flush()?;
        writer.get_ref().sync_data()?;
        Ok(())
    }
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink").field("path", &self.path).finish()
    }
}
