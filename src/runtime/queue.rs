//! Joinable FIFO work queue
//!
//! This is the backbone of the crawl: an unbounded FIFO of pending work
//! items with an outstanding-work counter, modeled on the joinable queue
//! the fetch pool drains. It supports:
//!
//! - non-blocking `enqueue`
//! - suspending `dequeue` (FIFO across items *and* across blocked dequeuers)
//! - per-item completion acknowledgement via `ack`
//! - a `join` barrier that resolves once every enqueued item has been acked
//!
//! The counter invariant is load-bearing: `outstanding` equals the number of
//! items enqueued but not yet acked, and `join` only resolves when it
//! reaches zero with the queue drained. An `ack` that would drive the
//! counter below zero means an item was acknowledged twice; that corrupts
//! the barrier accounting and is treated as fatal.
//!
//! All state lives behind one mutex, so the check-then-register sequence in
//! `join` (and the empty-check in `dequeue`) cannot be split by a
//! suspension point.

use crate::runtime::promise::{promise, Resolver};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// An unbounded FIFO work queue with an outstanding-work join barrier.
///
/// Cloning is cheap and shares the underlying queue, so one instance can be
/// handed to the coordinator and every worker.
pub struct WorkQueue<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    items: VecDeque<T>,
    /// Blocked dequeuers, earliest first.
    waiters: VecDeque<Resolver<T>>,
    /// Tasks suspended on `join`.
    join_waiters: Vec<Resolver<()>>,
    /// Items enqueued but not yet acknowledged as done.
    outstanding: usize,
}

impl<T> WorkQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items: VecDeque::new(),
                waiters: VecDeque::new(),
                join_waiters: Vec::new(),
                outstanding: 0,
            })),
        }
    }

    /// Appends an item and increments the outstanding count.
    ///
    /// If any dequeuer is blocked, the earliest live one is handed the item
    /// directly; otherwise the item is queued. O(1) either way.
    pub fn enqueue(&self, item: T) {
        let mut inner = self.inner.lock().unwrap();
        inner.outstanding += 1;
        loop {
            match inner.waiters.pop_front() {
                Some(waiter) => {
                    // A dequeuer cancelled while blocked leaves an abandoned
                    // slot behind; skip it so the item is not lost.
                    if waiter.is_abandoned() {
                        continue;
                    }
                    drop(inner);
                    waiter.resolve(item);
                    return;
                }
                None => {
                    inner.items.push_back(item);
                    return;
                }
            }
        }
    }

    /// Removes and returns the oldest item, suspending while the queue is
    /// empty.
    ///
    /// Blocked dequeuers are served in the order they blocked.
    pub async fn dequeue(&self) -> T {
        let pending = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(item) = inner.items.pop_front() {
                return item;
            }
            let (promise, resolver) = promise();
            inner.waiters.push_back(resolver);
            promise
        };
        pending.await
    }

    /// Acknowledges completion of one previously dequeued item.
    ///
    /// Must be called exactly once per dequeued item, whatever the outcome
    /// of processing it. When the last outstanding item is acked and the
    /// queue is drained, every task suspended on [`join`](Self::join) is
    /// released.
    ///
    /// # Panics
    ///
    /// Panics if there is no outstanding item to acknowledge; a double ack
    /// corrupts the join barrier and must not be ignored.
    pub fn ack(&self) {
        let released = {
            let mut inner = self.inner.lock().unwrap();
            if inner.outstanding == 0 {
                panic!("work item acknowledged twice: outstanding count underflow");
            }
            inner.outstanding -= 1;
            if inner.outstanding == 0 && inner.items.is_empty() {
                inner.join_waiters.drain(..).collect()
            } else {
                Vec::new()
            }
        };
        for waiter in released {
            if !waiter.is_abandoned() {
                waiter.resolve(());
            }
        }
    }

    /// Suspends until every enqueued item has been acknowledged.
    ///
    /// Returns immediately if the barrier is already down. The barrier check
    /// and waiter registration happen under one lock acquisition, so a zero
    /// crossing between them cannot be missed.
    pub async fn join(&self) {
        let pending = {
            let mut inner = self.inner.lock().unwrap();
            if inner.outstanding == 0 && inner.items.is_empty() {
                return;
            }
            let (promise, resolver) = promise();
            inner.join_waiters.push(resolver);
            promise
        };
        pending.await
    }

    /// Number of items waiting to be dequeued.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// True if no items are waiting to be dequeued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().items.is_empty()
    }

    /// Number of items enqueued but not yet acknowledged.
    pub fn outstanding(&self) -> usize {
        self.inner.lock().unwrap().outstanding
    }

    #[cfg(test)]
    pub(crate) fn waiting_dequeuers(&self) -> usize {
        self.inner.lock().unwrap().waiters.len()
    }
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for WorkQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("WorkQueue")
            .field("len", &inner.items.len())
            .field("outstanding", &inner.outstanding)
            .finish()
    }
}
