//! Single-assignment deferred values
//!
//! A [`Promise`] is the suspension primitive everything else in this module
//! tree is built on: an empty result slot a task can await, paired with a
//! [`Resolver`] that fills the slot exactly once. Resolving wakes the
//! awaiting task; awaiting an already-resolved promise completes without
//! suspending, so a wakeup can never be missed.
//!
//! Resolving a promise a second time is a scheduler bug, not a recoverable
//! condition: it would corrupt the work accounting built on top of these
//! slots, so it panics instead of silently overwriting the value.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Internal slot state shared between a `Promise` and its `Resolver`.
enum Slot<T> {
    /// Not yet resolved; holds the waker of the awaiting task, if any.
    Empty { waker: Option<Waker> },
    /// Resolved, value not yet consumed.
    Full(T),
    /// Resolved and consumed by the awaiting task.
    Taken,
    /// The consuming side was dropped before resolution.
    Abandoned,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
}

/// The consuming half of a deferred value. Awaiting it yields the resolved
/// result.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

/// The producing half of a deferred value.
pub struct Resolver<T> {
    shared: Arc<Shared<T>>,
}

/// Creates a connected promise/resolver pair.
pub fn promise<T>() -> (Promise<T>, Resolver<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot::Empty { waker: None }),
    });
    (
        Promise {
            shared: Arc::clone(&shared),
        },
        Resolver { shared },
    )
}

impl<T> Resolver<T> {
    /// Resolves the promise, waking the awaiting task if there is one.
    ///
    /// If the consuming side has already been dropped (a cancelled task),
    /// the value is discarded. Resolving twice panics: a second resolution
    /// indicates corrupted scheduling state and must not be papered over.
    pub fn resolve(&self, value: T) {
        let mut slot = self.shared.slot.lock().unwrap();
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Empty { waker } => {
                *slot = Slot::Full(value);
                drop(slot);
                if let Some(waker) = waker {
                    waker.wake();
                }
            }
            Slot::Abandoned => {
                *slot = Slot::Abandoned;
            }
            Slot::Full(_) | Slot::Taken => panic!("promise resolved twice"),
        }
    }

    /// Returns true if the consuming side was dropped before resolution.
    ///
    /// Producers holding queued resolvers use this to skip slots whose
    /// consumer has gone away instead of resolving into the void.
    pub fn is_abandoned(&self) -> bool {
        matches!(*self.shared.slot.lock().unwrap(), Slot::Abandoned)
    }
}

impl<T> Future for Promise<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut slot = self.shared.slot.lock().unwrap();
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Full(value) => Poll::Ready(value),
            Slot::Empty { .. } => {
                *slot = Slot::Empty {
                    waker: Some(cx.waker().clone()),
                };
                Poll::Pending
            }
            Slot::Taken => panic!("promise polled after completion"),
            // Abandoned is only ever set by our own Drop, which cannot have
            // run while this Promise is still being polled.
            Slot::Abandoned => unreachable!("promise abandoned while alive"),
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        let mut slot = self.shared.slot.lock().unwrap();
        if let Slot::Empty { .. } = *slot {
            *slot = Slot::Abandoned;
        }
    }
}

impl<T> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Promise")
    }
}

impl<T> std::fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Resolver")
    }
}
