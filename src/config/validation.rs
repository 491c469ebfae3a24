use crate::config::types::{Config, CrawlerConfig, OutputConfig, ScopeConfig, UserAgentConfig};
use crate::ConfigError;

/// Upper bound on the worker pool
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_scope_config(&config.scope)?;
    validate_output_config(&config.output)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates the excluded domain list
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    for domain in &config.excluded_domains {
        validate_domain_pattern(domain)?;
    }

    if let Some(path) = &config.ignore_file {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ignore_file cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    if config.state_path.is_empty() {
        return Err(ConfigError::Validation(
            "state_path cannot be empty".to_string(),
        ));
    }

    if config.output_path == config.state_path {
        return Err(ConfigError::Validation(format!(
            "output_path and state_path must differ, both are '{}'",
            config.output_path
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.agents.is_empty() {
        return Err(ConfigError::Validation(
            "at least one user agent is required".to_string(),
        ));
    }

    if config.agents.iter().any(|a| a.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user agents cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates an excluded domain suffix
///
/// Accepts `example.com`, `*.example.com` and `.example.com`; all three mean
/// "this domain and every subdomain of it".
pub(crate) fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern
        .strip_prefix("*.")
        .or_else(|| pattern.strip_prefix('.'))
        .unwrap_or(pattern);

    validate_domain_string(domain)
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_domain_pattern() {
        assert!(validate_domain_pattern("example.com").is_ok());
        assert!(validate_domain_pattern("*.example.com").is_ok());
        assert!(validate_domain_pattern(".example.com").is_ok());
        assert!(validate_domain_pattern("gov.br").is_ok());

        assert!(validate_domain_pattern("").is_err());
        assert!(validate_domain_pattern("*.").is_err());
        assert!(validate_domain_pattern("example.com.").is_err());
        assert!(validate_domain_pattern("exa mple.com").is_err());
        assert!(validate_domain_pattern("a..com").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = Config::default();
        config.crawler.workers = 0;
        assert!(validate(&config).is_err());

        config.crawler.workers = MAX_WORKERS + 1;
        assert!(validate(&config).is_err());

        config.crawler.workers = MAX_WORKERS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_output_and_state_paths_must_differ() {
        let mut config = Config::default();
        config.output.state_path = config.output.output_path.clone();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_list_rejected() {
        let mut config = Config::default();
        config.user_agent.agents.clear();
        assert!(validate(&config).is_err());
    }
}
