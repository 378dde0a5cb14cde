//! Fetch worker implementation
//!
//! A [`FetchWorker`] is one long-lived cooperative task bound to the work
//! queue, looping dequeue, fetch-with-retry, parse, persist, ack until
//! cancelled. Its only suspension points outside the fetch itself are the
//! dequeue and the retry backoff, so cancellation (which lands at the next
//! suspension) can interrupt an idle worker but never an item between its
//! dequeue and its ack.
//!
//! Error containment is deliberate: nothing in here propagates to the
//! coordinator. Every path through an item ends in exactly one `ack`,
//! which is what keeps the queue's join barrier honest.

use crate::crawler::fetcher::{fetch_url, FetchOutcome};
use crate::crawler::parser::{parse_records, Record};
use crate::crawler::stats::CrawlStats;
use crate::crawler::WorkItem;
use crate::runtime::{Task, WorkQueue};
use crate::storage::{RecordStore, SqliteStorage};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Result of driving one item through fetch-with-retry.
enum Fetched {
    /// A success response to hand to the parser
    Body { content_type: String, body: Vec<u8> },
    /// Dropped on a non-retryable HTTP anomaly, already logged
    Dropped,
    /// Every attempt failed with a transient error
    Exhausted,
}

/// One fetch worker in the pool
pub struct FetchWorker {
    id: usize,
    queue: WorkQueue<WorkItem>,
    client: Client,
    storage: Arc<Mutex<SqliteStorage>>,
    stats: Arc<CrawlStats>,
    max_tries: u32,
    retry_delay: Duration,
}

impl FetchWorker {
    pub fn new(
        id: usize,
        queue: WorkQueue<WorkItem>,
        client: Client,
        storage: Arc<Mutex<SqliteStorage>>,
        stats: Arc<CrawlStats>,
        max_tries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            id,
            queue,
            client,
            storage,
            stats,
            max_tries,
            retry_delay,
        }
    }

    /// Starts the worker loop as a cooperative task.
    pub fn spawn(self) -> Task<()> {
        Task::spawn(async move { self.run().await })
    }

    async fn run(self) {
        tracing::debug!("worker {} started", self.id);
        loop {
            // Sole cancellation point between items.
            let item = self.queue.dequeue().await;
            self.process(&item).await;
            self.queue.ack();
        }
    }

    /// Drives one item to a terminal state. Never fails; outcomes surface
    /// through logs and counters only.
    async fn process(&self, item: &WorkItem) {
        match self.fetch_with_retry(item).await {
            Fetched::Body { content_type, body } => match parse_records(&content_type, &body) {
                Ok(records) => self.persist(item, &records),
                Err(e) => {
                    tracing::warn!("{}: dropping response: {}", item.date, e);
                    self.stats.record_parse_failure();
                }
            },
            Fetched::Dropped => self.stats.record_dropped(),
            Fetched::Exhausted => {
                tracing::warn!(
                    "{}: giving up after {} attempts",
                    item.date,
                    self.max_tries
                );
                self.stats.record_failed();
            }
        }
    }

    /// Fetches with up to `max_tries` attempts.
    ///
    /// Transient failures (network errors, timeouts, HTTP 5xx/429) are
    /// retried with exponential backoff; redirects and other non-success
    /// statuses terminate the item immediately.
    async fn fetch_with_retry(&self, item: &WorkItem) -> Fetched {
        for attempt in 1..=self.max_tries {
            if attempt > 1 {
                tokio::time::sleep(backoff_delay(self.retry_delay, attempt)).await;
            }

            match fetch_url(&self.client, item.url.as_str()).await {
                FetchOutcome::Success {
                    status_code: _,
                    content_type,
                    body,
                } => {
                    tracing::debug!(
                        "{}: fetched {} bytes on attempt {}",
                        item.date,
                        body.len(),
                        attempt
                    );
                    return Fetched::Body { content_type, body };
                }

                FetchOutcome::Redirect {
                    status_code,
                    location,
                } => {
                    tracing::warn!(
                        "{}: unexpected redirect (HTTP {} -> {}), dropping",
                        item.date,
                        status_code,
                        location.as_deref().unwrap_or("<no location>")
                    );
                    return Fetched::Dropped;
                }

                FetchOutcome::HttpStatus { status_code } if is_transient_status(status_code) => {
                    tracing::info!(
                        "{}: HTTP {} on attempt {}/{}",
                        item.date,
                        status_code,
                        attempt,
                        self.max_tries
                    );
                }

                FetchOutcome::HttpStatus { status_code } => {
                    tracing::warn!("{}: HTTP {}, dropping", item.date, status_code);
                    return Fetched::Dropped;
                }

                FetchOutcome::Network { kind, detail } => {
                    tracing::info!(
                        "{}: {} error on attempt {}/{}: {}",
                        item.date,
                        kind,
                        attempt,
                        self.max_tries,
                        detail
                    );
                }
            }
        }

        Fetched::Exhausted
    }

    /// Writes one response's records in a single transaction.
    fn persist(&self, item: &WorkItem, records: &[Record]) {
        if records.is_empty() {
            tracing::debug!("{}: no records in payload", item.date);
            self.stats.record_completed(0);
            return;
        }

        let mut storage = self.storage.lock().unwrap();
        match storage.insert_batch(records) {
            Ok(inserted) => {
                tracing::info!("{} done, {} records", item.date, inserted);
                self.stats.record_completed(inserted);
            }
            Err(e) => {
                tracing::error!("{}: failed to store records: {}", item.date, e);
                self.stats.record_failed();
            }
        }
    }
}

/// Delay before `attempt` (attempt >= 2), doubling per attempt.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * (1u32 << (attempt - 2).min(6))
}

/// Statuses worth another attempt: server-side errors and throttling.
fn is_transient_status(status_code: u16) -> bool {
    status_code == 429 || (500..=599).contains(&status_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_transient() {
        assert!(is_transient_status(500));
        assert!(is_transient_status(503));
        assert!(is_transient_status(429));
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!is_transient_status(400));
        assert!(!is_transient_status(404));
        assert!(!is_transient_status(410));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let base = Duration::from_millis(100);

        assert_eq!(backoff_delay(base, 2), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(400));
        // Capped so a large max_tries cannot grow into hour-long waits.
        assert_eq!(backoff_delay(base, 20), Duration::from_millis(6400));
    }
}
