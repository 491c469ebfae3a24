//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared reqwest client with the configured timeout
//! - Rotating the User-Agent header per request
//! - Classifying the response into a [`FetchResult`]
//!
//! A single attempt is made per URL; there is no retry or backoff.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{header, Client};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page (2xx)
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The request did not complete within the configured timeout
    Timeout,

    /// Network error (connection refused, DNS, TLS, body read, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// Short human-readable reason for a failed fetch
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::Timeout => Some("timed out".to_string()),
            FetchResult::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Something that can retrieve a page body for a URL
///
/// The crawl engine depends only on this trait, so tests can drive it with
/// an in-memory site instead of a live HTTP server.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Upper bound for the whole request, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher used by the binary
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout
    /// * `user_agents` - Pool to pick a random User-Agent from for each request
    pub fn new(timeout: Duration, user_agents: Vec<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
            user_agents,
        })
    }

    fn pick_user_agent(&self) -> Option<&str> {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL with a single GET request
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | Success (body read as text) |
    /// | Any other status | HttpError |
    /// | Request or body timeout | Timeout |
    /// | Connection, TLS, redirect or decode failure | NetworkError |
    async fn fetch(&self, url: &str) -> FetchResult {
        let mut request = self.client.get(url);
        if let Some(agent) = self.pick_user_agent() {
            request = request.header(header::USER_AGENT, agent);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify_error(e),
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            },
            Err(e) => classify_error(e),
        }
    }
}

fn classify_error(error: reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::Timeout
    } else {
        FetchResult::NetworkError {
            error: error.to_string(),
        }
    }
}
