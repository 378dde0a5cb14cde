//! Cooperative scheduling primitives for the fetch pool
//!
//! This module is the concurrency engine the crawler runs on, independent
//! of anything HTTP- or market-data-specific:
//!
//! - [`Promise`]/[`Resolver`] - a single-assignment deferred value; the
//!   suspension primitive
//! - [`WorkQueue`] - a joinable FIFO with an outstanding-work barrier
//! - [`Task`] - a spawn/cancel handle over one cooperative computation
//!
//! Workers suspend on the queue, the coordinator suspends on the queue's
//! join barrier, and everything interleaves on the runtime without ever
//! blocking a thread.

mod promise;
mod queue;
mod task;

pub use promise::{promise, Promise, Resolver};
pub use queue::WorkQueue;
pub use task::Task;
