//! Output module for recording crawled URLs and crawl statistics
//!
//! This module handles:
//! - The append-only record of successfully fetched URLs
//! - Reading that record back (for `--stats` and tests)
//! - Live crawl counters and their end-of-run summary

mod csv_sink;
pub mod stats;

pub use csv_sink::{CsvSink, OUTPUT_HEADER};
pub use stats::{print_snapshot_report, print_statistics, CrawlStatistics, CrawlStats};

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing or reading the output file
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Durable, append-only record of crawled URLs
///
/// `append` must not return until the record is flushed to storage, and must
/// be safe to call from many workers at once.
pub trait OutputSink: Send + Sync {
    fn append(&self, url: &str) -> OutputResult<()>;
}

/// Reads every URL row from an output file, skipping the header
///
/// A missing file reads as empty.
pub fn read_output(path: &Path) -> OutputResult<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(url) = record.get(0) {
            if !url.is_empty() {
                urls.push(url.to_string());
            }
        }
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_output() {
        let dir = TempDir::new().unwrap();
        assert!(read_output(&dir.path().join("none.csv")).unwrap().is_empty());
    }

    #[test]
    fn test_read_output_skips_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "URL\nhttps://a.test/\nhttps://b.test/\n").unwrap();

        assert_eq!(
            read_output(&path).unwrap(),
            vec!["https://a.test/".to_string(), "https://b.test/".to_string()]
        );
    }
}
