//! Ripple-Crawl: a resumable breadth-first web crawler
//!
//! This crate implements a concurrent crawler that fetches pages from one or
//! more seeds, follows outbound links that pass the domain-exclusion and scope
//! rules, records every successfully fetched URL to a CSV file, and snapshots
//! its frontier so an interrupted crawl can be resumed.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("Either a seed URL or a file with seed URLs must be provided")]
    MissingSeedSource,

    #[error("Failed to read seed file {path}: {source}")]
    SeedFile {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, Frontier, RunOutcome};
pub use storage::CrawlState;
pub use url::{resolve, DomainRegistry, PublicSuffixRegistry, Scoper};
