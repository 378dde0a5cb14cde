//! Crawl coordinator - run orchestration
//!
//! The coordinator owns the run: it seeds the work queue with one item per
//! calendar date, starts the worker pool, suspends on the queue's join
//! barrier, and tears the pool down once the barrier falls. Per-item
//! outcomes never reach it (workers keep those to themselves, in logs and
//! counters), so the only thing it awaits is "all items reached a
//! terminal state".
//!
//! Cancellation ordering matters here: workers are only cancelled *after*
//! `join` resolves, and their sole cancellation point is the next dequeue,
//! so no in-flight item can lose its ack to the teardown.

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::stats::{CrawlStats, StatsSnapshot};
use crate::crawler::worker::FetchWorker;
use crate::crawler::WorkItem;
use crate::runtime::{Task, WorkQueue};
use crate::storage::SqliteStorage;
use crate::CrawlError;
use chrono::NaiveDate;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Work items seeded (one per date in the range)
    pub items: usize,

    /// Wall-clock time from seeding to the last ack
    pub elapsed: Duration,

    /// Per-outcome counters accumulated by the workers
    pub stats: StatsSnapshot,
}

/// Main crawl coordinator structure
pub struct Coordinator {
    config: CrawlConfig,
    queue: WorkQueue<WorkItem>,
    storage: Arc<Mutex<SqliteStorage>>,
    client: Client,
    stats: Arc<CrawlStats>,
}

impl Coordinator {
    /// Validates the configuration and opens the run's resources.
    ///
    /// Opening storage rebuilds the transaction table, so constructing a
    /// coordinator already commits to replacing the previous run's data.
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        validate(&config)?;

        let storage = SqliteStorage::open(&config.database_path)?;
        let client = build_http_client(config.request_timeout)?;

        Ok(Self {
            config,
            queue: WorkQueue::new(),
            storage: Arc::new(Mutex::new(storage)),
            client,
            stats: Arc::new(CrawlStats::default()),
        })
    }

    /// Runs the crawl to completion.
    ///
    /// Seeds every date before starting any worker, awaits the queue's
    /// join barrier, then cancels the (by then idle) workers and waits for
    /// their teardown before reporting.
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();

        let mut seeded = 0;
        for date in date_range(self.config.start_date, self.config.end_date) {
            let item = WorkItem::for_date(&self.config.endpoint, date)?;
            self.queue.enqueue(item);
            seeded += 1;
        }
        tracing::info!(
            "seeded {} dates ({} .. {}) into the work queue",
            seeded,
            self.config.start_date,
            self.config.end_date
        );

        let workers: Vec<Task<()>> = (0..self.config.max_tasks)
            .map(|id| {
                FetchWorker::new(
                    id,
                    self.queue.clone(),
                    self.client.clone(),
                    Arc::clone(&self.storage),
                    Arc::clone(&self.stats),
                    self.config.max_tries,
                    self.config.retry_delay,
                )
                .spawn()
            })
            .collect();
        tracing::info!("started {} fetch workers", workers.len());

        self.queue.join().await;

        // Every item is acked; the workers are all parked on their next
        // dequeue, which is where cancellation lands.
        for worker in &workers {
            worker.cancel();
        }
        for worker in workers {
            let _ = worker.join().await;
        }

        let elapsed = started.elapsed();
        let stats = self.stats.snapshot();
        tracing::info!(
            "crawl finished in {:.2?}: {} items ({} completed, {} failed, {} parse failures, {} dropped), {} records",
            elapsed,
            seeded,
            stats.completed,
            stats.failed,
            stats.parse_failures,
            stats.dropped,
            stats.records
        );

        Ok(CrawlReport {
            items: seeded,
            elapsed,
            stats,
        })
    }

    /// Releases the storage handle.
    ///
    /// Call after `run`, or after an interrupt, so the database is closed
    /// before the process exits.
    pub fn close(self) -> Result<(), CrawlError> {
        // An aborted worker may still hold a clone for a moment; in that
        // case the connection closes when the last clone drops.
        if let Ok(mutex) = Arc::try_unwrap(self.storage) {
            mutex.into_inner().unwrap().close()?;
        }
        Ok(())
    }
}

/// Iterates the inclusive date range with a fixed daily step.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn date_range_is_inclusive() {
        let dates: Vec<_> = date_range(date("2020-01-01"), date("2020-01-03")).collect();
        assert_eq!(
            dates,
            vec![date("2020-01-01"), date("2020-01-02"), date("2020-01-03")]
        );
    }

    #[test]
    fn date_range_with_one_day() {
        let dates: Vec<_> = date_range(date("2020-02-29"), date("2020-02-29")).collect();
        assert_eq!(dates, vec![date("2020-02-29")]);
    }

    #[test]
    fn date_range_crosses_month_boundaries() {
        let dates: Vec<_> = date_range(date("2019-12-30"), date("2020-01-02")).collect();
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[1], date("2019-12-31"));
        assert_eq!(dates[2], date("2020-01-01"));
    }

    #[test]
    fn coordinator_rejects_an_invalid_config() {
        let mut config = CrawlConfig::new(date("2020-01-02"), date("2020-01-01"));
        config.database_path = std::path::PathBuf::from(":memory:");
        assert!(Coordinator::new(config).is_err());
    }
}
