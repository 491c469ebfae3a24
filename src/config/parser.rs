use crate::config::types::{Config, ScopeMode};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The result is not validated: command-line overrides are merged in first,
/// then the caller runs [`validate`](crate::config::validate) once.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ripple_crawl::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Computes a fingerprint of the rules that decide which URLs enter the frontier
///
/// Stored with every snapshot so a resumed crawl can tell whether it runs
/// under the same scope as the one that produced the snapshot. The excluded
/// set is sorted first, so ordering in config files does not matter.
///
/// # Returns
///
/// Hex-encoded SHA-256 of the mode and the excluded suffixes
pub fn compute_scope_hash(mode: ScopeMode, excluded: &[String]) -> String {
    let mut sorted: Vec<&str> = excluded.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut hasher = Sha256::new();
    hasher.update(mode.as_str().as_bytes());
    for suffix in sorted {
        hasher.update(b"\n");
        hasher.update(suffix.as_bytes());
    }
    hex::encode(hasher.finalize())
}
