//! Concurrency-safe crawl frontier
//!
//! The frontier owns the pending queue and the three membership sets that
//! drive duplicate suppression:
//! - `queued`: admitted but not yet dequeued
//! - `in_flight`: dequeued by a worker, fetch not finished
//! - `visited`: fetch attempted and recorded
//!
//! Every check-then-mutate sequence runs under the one state lock, so a URL
//! can never be admitted twice by racing producers.

use crate::storage::CrawlState;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    in_flight: HashSet<String>,
    visited: HashSet<String>,
    closed: bool,
}

impl FrontierState {
    fn is_known(&self, url: &str) -> bool {
        self.visited.contains(url) || self.queued.contains(url) || self.in_flight.contains(url)
    }

    fn admit(&mut self, url: &str) -> bool {
        if self.is_known(url) {
            return false;
        }
        self.queued.insert(url.to_string());
        self.queue.push_back(url.to_string());
        true
    }

    fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.in_flight.is_empty()
    }
}

/// Work queue shared by every crawl worker
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits a URL unless it is already visited, queued or in flight
    ///
    /// Returns true if the URL was added to the queue. The return value is
    /// informational; admission itself is decided here under the lock.
    pub fn enqueue(&self, url: &str) -> bool {
        let admitted = self.lock().admit(url);
        if admitted {
            self.notify.notify_waiters();
        }
        admitted
    }

    /// Takes the next URL in FIFO order, waiting while work is outstanding
    ///
    /// The URL moves from `queued` to `in_flight`. Returns None once the
    /// frontier is closed, or once the queue is empty and nothing is in
    /// flight (the crawl has drained).
    pub async fn dequeue(&self) -> Option<String> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(url) = state.queue.pop_front() {
                    state.queued.remove(&url);
                    state.in_flight.insert(url.clone());
                    return Some(url);
                }
                if state.in_flight.is_empty() {
                    drop(state);
                    // Wake other idle workers so they observe the drain too
                    self.notify.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Signals that the worker holding `url` has finished with it
    pub fn task_done(&self, url: &str) {
        let wake = {
            let mut state = self.lock();
            state.in_flight.remove(url);
            state.in_flight.is_empty()
        };
        if wake {
            self.notify.notify_waiters();
        }
    }

    /// Records a URL as visited
    ///
    /// Returns true only for the first caller; a second worker that raced
    /// on the same URL gets false and must not emit output for it.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.lock().visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.lock().visited.contains(url)
    }

    /// Stops handing out work; pending URLs stay queued for the snapshot
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    /// True when nothing is queued and nothing is in flight
    pub fn is_drained(&self) -> bool {
        self.lock().is_drained()
    }

    /// Waits until every in-flight URL has been released with [`task_done`]
    ///
    /// [`task_done`]: Frontier::task_done
    pub async fn wait_for_idle(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.lock().in_flight.is_empty() {
                return;
            }

            notified.await;
        }
    }

    /// Restores a snapshot into an empty or partially filled frontier
    ///
    /// Visited URLs are merged first; each pending URL then goes through the
    /// normal admission check, so anything already visited is skipped.
    /// Returns the number of pending URLs re-admitted.
    pub fn restore(&self, snapshot: &CrawlState) -> usize {
        let admitted = {
            let mut state = self.lock();
            state.visited.extend(snapshot.visited.iter().cloned());
            snapshot
                .pending
                .iter()
                .filter(|url| state.admit(url))
                .count()
        };
        if admitted > 0 {
            self.notify.notify_waiters();
        }
        admitted
    }

    /// Captures visited URLs and the queued URLs in order
    ///
    /// In-flight URLs belong to neither part of the snapshot.
    pub fn snapshot(&self) -> CrawlState {
        let state = self.lock();
        let mut visited: Vec<String> = state.visited.iter().cloned().collect();
        visited.sort();
        CrawlState {
            visited,
            pending: state.queue.iter().cloned().collect(),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.lock().in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_enqueue_admits_once() {
        let frontier = Frontier::new();
        assert!(frontier.enqueue("https://example.com/a"));
        assert!(!frontier.enqueue("https://example.com/a"));
        assert_eq!(frontier.queue_len(), 1);
    }

    #[test]
    fn test_enqueue_visited_is_noop() {
        let frontier = Frontier::new();
        frontier.mark_visited("https://example.com/a");

        assert!(!frontier.enqueue("https://example.com/a"));
        assert_eq!(frontier.queue_len(), 0);
        assert_eq!(frontier.visited_len(), 1);
    }

    #[tokio::test]
    async fn test_dequeue_is_fifo() {
        let frontier = Frontier::new();
        frontier.enqueue("https://example.com/1");
        frontier.enqueue("https://example.com/2");
        frontier.enqueue("https://example.com/3");

        assert_eq!(frontier.dequeue().await.as_deref(), Some("https://example.com/1"));
        assert_eq!(frontier.dequeue().await.as_deref(), Some("https://example.com/2"));
        assert_eq!(frontier.dequeue().await.as_deref(), Some("https://example.com/3"));
    }

    #[tokio::test]
    async fn test_in_flight_url_is_not_readmitted() {
        let frontier = Frontier::new();
        frontier.enqueue("https://example.com/a");

        let url = frontier.dequeue().await.unwrap();
        assert_eq!(frontier.in_flight_len(), 1);
        assert!(!frontier.enqueue(&url));

        frontier.task_done(&url);
        assert_eq!(frontier.in_flight_len(), 0);
    }

    #[tokio::test]
    async fn test_dequeue_returns_none_when_drained() {
        let frontier = Frontier::new();
        assert_eq!(frontier.dequeue().await, None);

        frontier.enqueue("https://example.com/a");
        let url = frontier.dequeue().await.unwrap();
        frontier.mark_visited(&url);
        frontier.task_done(&url);

        assert!(frontier.is_drained());
        assert_eq!(frontier.dequeue().await, None);
    }

    #[tokio::test]
    async fn test_dequeue_waits_for_in_flight_work() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("https://example.com/a");
        let first = frontier.dequeue().await.unwrap();

        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        // The in-flight page discovers a new link before finishing
        frontier.enqueue("https://example.com/b");
        frontier.task_done(&first);

        let next = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.as_deref(), Some("https://example.com/b"));
    }

    #[tokio::test]
    async fn test_idle_workers_released_when_last_task_finishes() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("https://example.com/a");
        let url = frontier.dequeue().await.unwrap();

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                tokio::spawn(async move { frontier.dequeue().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.task_done(&url);

        for waiter in waiters {
            let result = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(result, None);
        }
    }

    #[tokio::test]
    async fn test_close_releases_waiters_and_keeps_queue() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("https://example.com/a");
        frontier.enqueue("https://example.com/b");
        let url = frontier.dequeue().await.unwrap();

        frontier.close();
        assert_eq!(frontier.dequeue().await, None);

        frontier.task_done(&url);
        let snapshot = frontier.snapshot();
        assert_eq!(snapshot.pending, vec!["https://example.com/b".to_string()]);
    }

    #[tokio::test]
    async fn test_wait_for_idle() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("https://example.com/a");
        let url = frontier.dequeue().await.unwrap();

        let idle = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.wait_for_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!idle.is_finished());

        frontier.task_done(&url);
        tokio::time::timeout(Duration::from_secs(1), idle)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_restore_skips_visited_pending() {
        let frontier = Frontier::new();
        let snapshot = CrawlState {
            visited: vec!["https://a.test/".to_string(), "https://b.test/".to_string()],
            pending: vec![
                "https://c.test/".to_string(),
                "https://a.test/".to_string(),
                "https://d.test/".to_string(),
                "https://c.test/".to_string(),
            ],
        };

        assert_eq!(frontier.restore(&snapshot), 2);
        assert_eq!(frontier.visited_len(), 2);
        assert!(frontier.is_visited("https://a.test/"));

        let saved = frontier.snapshot();
        assert_eq!(
            saved.pending,
            vec!["https://c.test/".to_string(), "https://d.test/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_snapshot_excludes_in_flight() {
        let frontier = Frontier::new();
        frontier.enqueue("https://example.com/a");
        frontier.enqueue("https://example.com/b");
        frontier.mark_visited("https://example.com/seen");

        let _in_flight = frontier.dequeue().await.unwrap();
        let snapshot = frontier.snapshot();

        assert_eq!(snapshot.visited, vec!["https://example.com/seen".to_string()]);
        assert_eq!(snapshot.pending, vec!["https://example.com/b".to_string()]);
    }

    #[test]
    fn test_mark_visited_first_caller_wins() {
        let frontier = Frontier::new();
        assert!(frontier.mark_visited("https://example.com/a"));
        assert!(!frontier.mark_visited("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_concurrent_enqueue_admits_each_url_once() {
        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                let mut admitted = 0;
                for i in 0..100 {
                    if frontier.enqueue(&format!("https://example.com/{}", i)) {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }

        assert_eq!(total, 100);
        assert_eq!(frontier.queue_len(), 100);
    }
}
