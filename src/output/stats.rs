//! Crawl counters and statistics display
//!
//! Workers bump the atomic counters in [`CrawlStats`] as they go; a
//! [`CrawlStatistics`] value is the plain copy printed at the end of a run.

use crate::storage::Snapshot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live counters shared by every worker
#[derive(Debug)]
pub struct CrawlStats {
    started: Instant,
    pages_crawled: AtomicU64,
    fetch_errors: AtomicU64,
    output_errors: AtomicU64,
    links_found: AtomicU64,
    links_admitted: AtomicU64,
    links_excluded: AtomicU64,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            pages_crawled: AtomicU64::new(0),
            fetch_errors: AtomicU64::new(0),
            output_errors: AtomicU64::new(0),
            links_found: AtomicU64::new(0),
            links_admitted: AtomicU64::new(0),
            links_excluded: AtomicU64::new(0),
        }
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful fetch and returns the new total
    pub fn record_page(&self) -> u64 {
        self.pages_crawled.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_output_error(&self) {
        self.output_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links(&self, found: u64, admitted: u64, excluded: u64) {
        self.links_found.fetch_add(found, Ordering::Relaxed);
        self.links_admitted.fetch_add(admitted, Ordering::Relaxed);
        self.links_excluded.fetch_add(excluded, Ordering::Relaxed);
    }

    pub fn pages_crawled(&self) -> u64 {
        self.pages_crawled.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Pages per second since the counters were created
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.pages_crawled() as f64 / secs
        } else {
            0.0
        }
    }

    /// Copies the counters into a printable summary
    pub fn summary(&self, visited: usize, pending: usize) -> CrawlStatistics {
        CrawlStatistics {
            pages_crawled: self.pages_crawled(),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            output_errors: self.output_errors.load(Ordering::Relaxed),
            links_found: self.links_found.load(Ordering::Relaxed),
            links_admitted: self.links_admitted.load(Ordering::Relaxed),
            links_excluded: self.links_excluded.load(Ordering::Relaxed),
            visited: visited as u64,
            pending: pending as u64,
            elapsed: self.elapsed(),
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Pages fetched successfully (one output row each)
    pub pages_crawled: u64,

    /// Fetches that timed out, failed or returned a non-2xx status
    pub fetch_errors: u64,

    /// Output rows that could not be written
    pub output_errors: u64,

    /// Raw hrefs seen on crawled pages
    pub links_found: u64,

    /// Links newly admitted to the frontier
    pub links_admitted: u64,

    /// Links dropped by the exclusion rules
    pub links_excluded: u64,

    /// Size of the visited set when the run ended
    pub visited: u64,

    /// URLs still queued when the run ended
    pub pending: u64,

    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Share of attempted fetches that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_crawled + self.fetch_errors;
        if attempted > 0 {
            (self.pages_crawled as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages crawled: {}", stats.pages_crawled);
    println!("  Fetch errors: {}", stats.fetch_errors);
    if stats.output_errors > 0 {
        println!("  Output write errors: {}", stats.output_errors);
    }
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Links:");
    println!("  Found: {}", stats.links_found);
    println!("  Admitted: {}", stats.links_admitted);
    println!("  Excluded: {}", stats.links_excluded);
    println!();

    println!("Frontier:");
    println!("  Visited: {}", stats.visited);
    println!("  Pending: {}", stats.pending);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        stats.success_rate(),
        stats.pages_crawled,
        stats.pages_crawled + stats.fetch_errors
    );
}

/// Prints what a saved snapshot holds, for `--stats`
pub fn print_snapshot_report(snapshot: Option<&Snapshot>, output_rows: usize) {
    println!("=== Saved Crawl State ===\n");

    match snapshot {
        Some(snapshot) => {
            println!("  Saved at: {}", snapshot.saved_at.to_rfc3339());
            println!("  Scope hash: {}", snapshot.scope_hash);
            println!("  Visited URLs: {}", snapshot.state.visited.len());
            println!("  Pending URLs: {}", snapshot.state.pending.len());
        }
        None => println!("  No snapshot found"),
    }

    println!("  Output rows: {}", output_rows);
}
