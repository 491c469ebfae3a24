//! Seed URL loading
//!
//! A crawl starts from exactly one seed source: a single URL or a file with
//! one URL per line.

use crate::ConfigError;
use std::path::{Path, PathBuf};
use url::Url;

/// Where the initial URLs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    Url(String),
    File(PathBuf),
}

impl SeedSource {
    /// Picks the seed source from the two mutually exclusive inputs
    ///
    /// A file takes precedence when both are given, matching the CLI, which
    /// rejects that combination before this is called.
    pub fn from_inputs(url: Option<String>, file: Option<PathBuf>) -> Result<Self, ConfigError> {
        match (url, file) {
            (_, Some(path)) => Ok(Self::File(path)),
            (Some(url), None) => Ok(Self::Url(url)),
            (None, None) => Err(ConfigError::MissingSeedSource),
        }
    }

    /// Loads and validates every seed
    ///
    /// Each seed must be an absolute http(s) URL. Seeds are returned in the
    /// serialized form the frontier compares on.
    pub fn load(&self) -> Result<Vec<String>, ConfigError> {
        let raw = match self {
            Self::Url(url) => vec![url.clone()],
            Self::File(path) => read_seed_file(path)?,
        };

        if raw.is_empty() {
            return Err(ConfigError::Validation(
                "seed source contains no URLs".to_string(),
            ));
        }

        raw.iter().map(|seed| parse_seed(seed)).collect()
    }
}

fn read_seed_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedFile {
        path: path.display().to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_seed(seed: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    url.set_fragment(None);
    Ok(url.to_string())
}
