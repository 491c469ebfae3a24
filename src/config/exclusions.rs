//! Excluded-domain set assembly
//!
//! The set is built once at startup from the configured list plus an optional
//! ignore file, and is read-only for the rest of the crawl.

use crate::config::types::ScopeConfig;
use crate::config::validation::validate_domain_pattern;
use crate::ConfigError;
use std::path::Path;

/// Reads an ignore file with one domain suffix per line
///
/// Blank lines and lines starting with `#` are skipped. A missing file is not
/// an error and yields an empty list; any other read failure is.
pub fn load_ignore_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No ignore file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };

    let mut entries = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match validate_domain_pattern(line) {
            Ok(()) => entries.push(line.to_string()),
            Err(e) => tracing::warn!(
                "Skipping {}:{}: {}",
                path.display(),
                line_no + 1,
                e
            ),
        }
    }

    tracing::info!(
        "Loaded {} excluded domains from {}",
        entries.len(),
        path.display()
    );
    Ok(entries)
}

/// Builds the final excluded suffix set
///
/// Entries are lowercased, stripped of any `*.` or `.` prefix, and
/// deduplicated while keeping first-seen order.
pub fn merge_exclusions(configured: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(configured.len() + extra.len());

    for entry in configured.iter().chain(extra.iter()) {
        let suffix = normalize_suffix(entry);
        if !suffix.is_empty() && !merged.contains(&suffix) {
            merged.push(suffix);
        }
    }

    merged
}

/// Loads the ignore file named by the scope config and merges it in
pub fn effective_exclusions(scope: &ScopeConfig) -> Result<Vec<String>, ConfigError> {
    let extra = match &scope.ignore_file {
        Some(path) => load_ignore_file(Path::new(path))?,
        None => Vec::new(),
    };
    Ok(merge_exclusions(&scope.excluded_domains, &extra))
}

fn normalize_suffix(entry: &str) -> String {
    let entry = entry.trim().to_lowercase();
    entry
        .strip_prefix("*.")
        .or_else(|| entry.strip_prefix('.'))
        .unwrap_or(entry.as_str())
        .to_string()
}
