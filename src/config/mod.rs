//! Configuration module for Ripple-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, assembling the excluded-domain set, and loading seed URLs.
//!
//! # Example
//!
//! ```no_run
//! use ripple_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod exclusions;
mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FailurePolicy, OutputConfig, ScopeConfig, ScopeMode, StateFormat,
    UserAgentConfig, DEFAULT_EXCLUDED_DOMAINS, DEFAULT_USER_AGENTS,
};

// Re-export loader functions
pub use exclusions::{effective_exclusions, load_ignore_file, merge_exclusions};
pub use parser::{compute_scope_hash, load_config};
pub use seeds::SeedSource;
pub use validation::validate;
