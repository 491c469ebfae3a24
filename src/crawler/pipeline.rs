//! Per-URL unit of work: fetch, record, extract, admit

use crate::config::{FailurePolicy, ScopeMode};
use crate::crawler::coordinator::CrawlEngine;
use crate::crawler::fetcher::FetchResult;
use crate::crawler::parser::extract_hrefs;
use crate::url::ScopeDecision;
use url::Url;

/// What processing a single dequeued URL amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Another worker already recorded this URL
    AlreadyVisited,
    /// Fetched and recorded; links were extracted unless in main-only mode
    Crawled {
        /// Raw hrefs found on the page
        discovered: usize,
        /// Links newly admitted to the frontier
        admitted: usize,
    },
    /// Fetch failed; no output row and no links
    Failed { reason: String },
}

impl CrawlEngine {
    /// Processes one URL taken from the frontier
    ///
    /// 1. Skip if the URL is already visited
    /// 2. Fetch it, bounded by the configured timeout
    /// 3. On success mark it visited and append it to the output sink
    /// 4. Unless in main-only mode, resolve, scope and enqueue its links
    /// 5. On failure apply the failure policy
    ///
    /// Failures never propagate as errors; they are logged and counted.
    pub async fn process_url(&self, url: &str) -> PageOutcome {
        if self.frontier().is_visited(url) {
            tracing::debug!("Skipping already visited {}", url);
            return PageOutcome::AlreadyVisited;
        }

        tracing::debug!("Fetching {}", url);
        let result = match tokio::time::timeout(self.settings().timeout, self.fetcher().fetch(url))
            .await
        {
            Ok(result) => result,
            Err(_) => FetchResult::Timeout,
        };

        match result {
            FetchResult::Success {
                final_url, body, ..
            } => self.handle_success(url, &final_url, &body),
            failure => self.handle_failure(url, &failure),
        }
    }

    fn handle_success(&self, url: &str, final_url: &str, body: &str) -> PageOutcome {
        if !self.frontier().mark_visited(url) {
            tracing::debug!("{} was recorded by another worker", url);
            return PageOutcome::AlreadyVisited;
        }

        if let Err(e) = self.sink().append(url) {
            tracing::error!("Failed to record {}: {}", url, e);
            self.stats().record_output_error();
        }

        let crawled = self.stats().record_page();
        let (discovered, admitted) = if self.scoper().mode() == ScopeMode::MainOnly {
            (0, 0)
        } else {
            self.admit_links(url, final_url, body)
        };

        // Checkpoint only once the page's links are in the frontier
        self.on_page_recorded(crawled);

        PageOutcome::Crawled {
            discovered,
            admitted,
        }
    }

    /// Resolves, scopes and enqueues the links of a fetched page
    ///
    /// Returns how many hrefs were found and how many were newly admitted.
    fn admit_links(&self, url: &str, final_url: &str, body: &str) -> (usize, usize) {
        // Relative links resolve against where the request ended up
        let base = match Url::parse(final_url).or_else(|_| Url::parse(url)) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Cannot use {} as a base URL: {}", final_url, e);
                return (0, 0);
            }
        };

        let hrefs = extract_hrefs(body);
        let mut admitted = 0;
        let mut excluded = 0;

        for href in &hrefs {
            match self.scoper().admit(&base, href) {
                ScopeDecision::Admit(link) => {
                    if self.frontier().enqueue(link.as_str()) {
                        admitted += 1;
                    }
                }
                ScopeDecision::Excluded => excluded += 1,
                ScopeDecision::Unresolvable => {}
            }
        }

        self.stats()
            .record_links(hrefs.len() as u64, admitted as u64, excluded as u64);
        tracing::debug!(
            "Crawled {}: {} links, {} new, {} excluded",
            url,
            hrefs.len(),
            admitted,
            excluded
        );

        (hrefs.len(), admitted)
    }

    fn handle_failure(&self, url: &str, failure: &FetchResult) -> PageOutcome {
        let reason = failure
            .failure_reason()
            .unwrap_or_else(|| "unknown error".to_string());
        tracing::warn!("Failed to fetch {}: {}", url, reason);
        self.stats().record_fetch_error();

        if self.settings().failure_policy == FailurePolicy::MarkVisited {
            self.frontier().mark_visited(url);
        }

        PageOutcome::Failed { reason }
    }
}
