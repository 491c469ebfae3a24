//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl engine that coordinates all aspects of
//! the crawling process, including:
//! - Restoring a previous snapshot and seeding the frontier
//! - Running the fixed-size worker pool until the frontier drains
//! - Handling interrupts with an optional grace period
//! - Saving the snapshot on completion, on interrupt and periodically

use crate::config::{CrawlerConfig, FailurePolicy};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::output::{CrawlStatistics, CrawlStats, OutputSink};
use crate::storage::StateStore;
use crate::url::Scoper;
use crate::{CrawlError, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How a call to [`CrawlEngine::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The frontier drained and every worker exited
    Completed,
    /// Shutdown was requested; pending URLs were saved for a later run
    Interrupted,
}

/// Run-time knobs of the engine, fixed for the whole run
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Number of concurrent workers
    pub workers: usize,
    /// Upper bound on a single fetch
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
    /// How long in-flight fetches may finish after an interrupt
    pub shutdown_grace: Duration,
    /// Save a snapshot every N crawled pages (0 = never)
    pub checkpoint_every: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

impl EngineSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            timeout: Duration::from_secs(config.timeout_secs),
            failure_policy: config.failure_policy,
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
            checkpoint_every: config.checkpoint_every,
        }
    }
}

/// The crawl engine
///
/// Owns the frontier and everything workers share. It is handed to worker
/// tasks behind an `Arc`; there is no other global state.
pub struct CrawlEngine {
    frontier: Frontier,
    scoper: Scoper,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn OutputSink>,
    store: Mutex<Box<dyn StateStore>>,
    stats: CrawlStats,
    settings: EngineSettings,
}

/// Releases a dequeued URL back to the frontier when the worker is done
/// with it, including when the worker task panics or is aborted
struct InFlight<'a> {
    frontier: &'a Frontier,
    url: &'a str,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.frontier.task_done(self.url);
    }
}

impl CrawlEngine {
    /// Creates a new engine with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `scoper` - Exclusion and scope rules for discovered links
    /// * `fetcher` - Page fetcher
    /// * `sink` - Where successfully crawled URLs are recorded
    /// * `store` - Snapshot backend
    /// * `settings` - Worker count, timeout and shutdown behaviour
    pub fn new(
        scoper: Scoper,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn OutputSink>,
        store: Box<dyn StateStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            frontier: Frontier::new(),
            scoper,
            fetcher,
            sink,
            store: Mutex::new(store),
            stats: CrawlStats::new(),
            settings,
        }
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn scoper(&self) -> &Scoper {
        &self.scoper
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub(crate) fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    pub(crate) fn sink(&self) -> &dyn OutputSink {
        self.sink.as_ref()
    }

    /// Restores the previous snapshot, if any
    ///
    /// Must be called before [`seed`](Self::seed) and before the workers
    /// start. Returns the number of pending URLs re-admitted.
    pub fn load_state(&self) -> Result<usize> {
        let snapshot = self
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .load()?;

        let Some(snapshot) = snapshot.filter(|s| !s.state.is_empty()) else {
            tracing::info!("No previous crawl state found, starting fresh");
            return Ok(0);
        };

        if snapshot.scope_hash != self.scoper.fingerprint() {
            tracing::warn!(
                "Saved state was taken under different scope rules; resuming anyway"
            );
        }

        let admitted = self.frontier.restore(&snapshot.state);
        tracing::info!(
            "Resumed crawl state saved at {}: {} visited, {} pending",
            snapshot.saved_at.to_rfc3339(),
            snapshot.state.visited.len(),
            admitted
        );
        Ok(admitted)
    }

    /// Discards any saved snapshot
    pub fn clear_state(&self) -> Result<()> {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear()?;
        Ok(())
    }

    /// Offers seed URLs to the frontier
    ///
    /// Seeds bypass the exclusion and scope rules but not the admission
    /// check, so seeds already visited in a resumed crawl are skipped.
    /// Returns the number admitted.
    pub fn seed(&self, seeds: &[String]) -> usize {
        let mut admitted = 0;
        for seed in seeds {
            let mut url = match Url::parse(seed.trim()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping invalid seed {}: {}", seed, e);
                    continue;
                }
            };
            url.set_fragment(None);

            if self.frontier.enqueue(url.as_str()) {
                admitted += 1;
            } else {
                tracing::debug!("Seed {} already known", url);
            }
        }
        tracing::info!("Seeded frontier with {} of {} URLs", admitted, seeds.len());
        admitted
    }

    /// Writes the current visited set and pending queue to the store
    pub fn save_state(&self) -> Result<()> {
        let state = self.frontier.snapshot();
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .save(&state, &self.scoper.fingerprint())?;
        tracing::info!(
            "Saved crawl state: {} visited, {} pending",
            state.visited.len(),
            state.pending.len()
        );
        Ok(())
    }

    /// Copies the live counters into a summary
    pub fn summary(&self) -> CrawlStatistics {
        self.stats
            .summary(self.frontier.visited_len(), self.frontier.queue_len())
    }

    /// Runs the crawl until the frontier drains or `shutdown` is cancelled
    ///
    /// Normal completion and interruption both end with a snapshot save.
    /// On interruption the frontier is closed, in-flight fetches get up to
    /// the configured grace period, remaining workers are aborted, then the
    /// snapshot is written. URLs still in flight at that point are in neither
    /// the visited set nor the pending list.
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome)` - How the run ended
    /// * `Err(CrawlError)` - The snapshot could not be saved, or a worker panicked
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) -> Result<RunOutcome> {
        tracing::info!(
            "Starting crawl with {} workers, {} URLs queued",
            self.settings.workers,
            self.frontier.queue_len()
        );

        let mut workers = JoinSet::new();
        for id in 0..self.settings.workers {
            let engine = Arc::clone(&self);
            let token = shutdown.clone();
            workers.spawn(async move { engine.worker_loop(id, token).await });
        }

        let mut worker_failure = None;
        let interrupted = tokio::select! {
            biased;
            _ = shutdown.cancelled() => true,
            result = join_workers(&mut workers) => {
                worker_failure = result.err();
                false
            }
        };

        if interrupted {
            self.shut_down(&mut workers).await;
            self.save_state()?;
            return Ok(RunOutcome::Interrupted);
        }

        self.save_state()?;
        if let Some(e) = worker_failure {
            return Err(e);
        }

        tracing::info!(
            "Crawl completed: {} pages crawled in {:?}",
            self.stats.pages_crawled(),
            self.stats.elapsed()
        );
        Ok(RunOutcome::Completed)
    }

    async fn shut_down(&self, workers: &mut JoinSet<()>) {
        tracing::info!(
            "Shutdown requested with {} URLs in flight",
            self.frontier.in_flight_len()
        );
        self.frontier.close();

        let grace = self.settings.shutdown_grace;
        if !grace.is_zero()
            && tokio::time::timeout(grace, self.frontier.wait_for_idle())
                .await
                .is_err()
        {
            tracing::warn!(
                "Grace period expired with {} URLs still in flight",
                self.frontier.in_flight_len()
            );
        }

        workers.abort_all();
        while workers.join_next().await.is_some() {}
    }

    async fn worker_loop(self: Arc<Self>, id: usize, shutdown: CancellationToken) {
        tracing::debug!("Worker {} started", id);

        loop {
            let url = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                next = self.frontier.dequeue() => match next {
                    Some(url) => url,
                    None => break,
                },
            };

            let _in_flight = InFlight {
                frontier: &self.frontier,
                url: &url,
            };
            self.process_url(&url).await;
        }

        tracing::debug!("Worker {} finished", id);
    }

    /// Progress reporting and periodic checkpoints, once per recorded page
    pub(crate) fn on_page_recorded(&self, crawled: u64) {
        if crawled % 10 == 0 {
            tracing::info!(
                "Progress: {} pages crawled, {} in frontier, {} in flight, {:.2} pages/sec",
                crawled,
                self.frontier.queue_len(),
                self.frontier.in_flight_len(),
                self.stats.rate()
            );
        }

        let every = self.settings.checkpoint_every;
        if every > 0 && crawled % every == 0 {
            if let Err(e) = self.save_state() {
                tracing::error!("Checkpoint failed: {}", e);
            }
        }
    }
}

async fn join_workers(workers: &mut JoinSet<()>) -> Result<()> {
    let mut first_error = None;
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Worker task failed: {}", e);
            first_error.get_or_insert(CrawlError::Worker(e.to_string()));
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
