use serde::{Deserialize, Serialize};

/// Domains that are never crawled unless the config replaces this list
pub const DEFAULT_EXCLUDED_DOMAINS: &[&str] = &[
    "github.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
];

/// Browser User-Agent strings rotated across requests
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
];

/// Main configuration structure for Ripple-Crawl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers, fixed for the run
    pub workers: usize,

    /// Upper bound on a single fetch attempt (seconds)
    pub timeout_secs: u64,

    /// What happens to a URL whose fetch failed
    pub failure_policy: FailurePolicy,

    /// How long in-flight fetches may finish after an interrupt (seconds)
    pub shutdown_grace_secs: u64,

    /// Save a snapshot every N completed pages (0 disables)
    pub checkpoint_every: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            timeout_secs: 10,
            failure_policy: FailurePolicy::default(),
            shutdown_grace_secs: 0,
            checkpoint_every: 0,
        }
    }
}

/// Policy for URLs whose fetch failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Mark the URL visited so it is never retried
    #[default]
    MarkVisited,
    /// Leave the URL unvisited so a later link can re-admit it
    Retry,
}

/// Which links a fetched page contributes to the frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Follow every in-scope link as-is
    #[default]
    Full,
    /// Collapse every link to `scheme://registrable-domain`
    BaseDomainOnly,
    /// Record the fetched URL only, never extract links
    MainOnly,
}

impl ScopeMode {
    /// Builds a mode from the two capture flags; main-only wins when both are set
    pub fn from_flags(capture_main_only: bool, capture_base_domain_only: bool) -> Self {
        if capture_main_only {
            Self::MainOnly
        } else if capture_base_domain_only {
            Self::BaseDomainOnly
        } else {
            Self::Full
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::BaseDomainOnly => "base-domain-only",
            Self::MainOnly => "main-only",
        }
    }
}

/// Link scope configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScopeConfig {
    pub mode: ScopeMode,

    /// Domain suffixes that are never crawled (subdomains included)
    pub excluded_domains: Vec<String>,

    /// Optional file with one extra excluded suffix per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_file: Option<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            mode: ScopeMode::default(),
            excluded_domains: DEFAULT_EXCLUDED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            ignore_file: Some("ignore.txt".to_string()),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path to the CSV file of crawled URLs
    pub output_path: String,

    /// Path to the crawl state snapshot
    pub state_path: String,

    /// Snapshot encoding
    pub state_format: StateFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "output.csv".to_string(),
            state_path: "crawler_state.db".to_string(),
            state_format: StateFormat::default(),
        }
    }
}

/// Snapshot backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateFormat {
    #[default]
    Sqlite,
    Json,
}

/// User agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Agents picked at random for each request
    pub agents: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agents: DEFAULT_USER_AGENTS.iter().map(|a| a.to_string()).collect(),
        }
    }
}
