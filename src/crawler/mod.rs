//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The concurrency-safe frontier with duplicate suppression
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML link extraction
//! - The per-URL pipeline and the worker pool that drives it

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pipeline;

pub use coordinator::{CrawlEngine, EngineSettings, RunOutcome};
pub use fetcher::{build_http_client, FetchResult, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::extract_hrefs;
pub use pipeline::PageOutcome;
