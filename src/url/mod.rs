//! URL handling module for Ripple-Crawl
//!
//! This module provides link resolution, host and registrable-domain
//! extraction, suffix matching against the excluded set, and the scope rules
//! that decide which discovered links reach the frontier.

mod domain;
mod matcher;
mod resolve;
mod scope;

// Re-export main functions
pub use domain::{extract_host, DomainRegistry, PublicSuffixRegistry};
pub use matcher::matches_suffix;
pub use resolve::resolve;
pub use scope::{ScopeDecision, Scoper};
