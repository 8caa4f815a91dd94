//! Generation-guarded state cell shared by a controller and its request tasks.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// Identifies one request started through [`Slot::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

/// Published view state plus the generation of the latest request.
///
/// The generation is only bumped or compared inside the watch channel's
/// write lock, so "start a request" and "apply a completion" cannot
/// interleave: a completion either lands before the newer request starts or
/// is discarded.
pub(crate) struct Slot<S> {
    tx: watch::Sender<S>,
    generation: AtomicU64,
}

impl<S> Slot<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    /// Start a new request: supersede every earlier ticket and publish the
    /// loading state produced by `update`.
    pub(crate) fn begin(&self, update: impl FnOnce(&mut S)) -> Ticket {
        let mut ticket = Ticket(0);
        self.tx.send_modify(|state| {
            ticket = Ticket(self.generation.fetch_add(1, Ordering::Relaxed) + 1);
            update(state);
        });
        ticket
    }

    /// Supersede every outstanding ticket without starting a request.
    pub(crate) fn invalidate(&self, update: impl FnOnce(&mut S)) {
        self.tx.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::Relaxed);
            update(state);
        });
    }

    /// Apply a completion if `ticket` is still the latest request.
    ///
    /// Returns `false` when the completion was stale and has been dropped.
    pub(crate) fn settle(&self, ticket: Ticket, update: impl FnOnce(&mut S)) -> bool {
        self.tx.send_if_modified(|state| {
            if self.generation.load(Ordering::Relaxed) != ticket.0 {
                return false;
            }
            update(state);
            true
        })
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S: Clone> Slot<S> {
    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Wait until the published state satisfies `done`, returning it.
    pub(crate) async fn wait_until(&self, done: impl FnMut(&S) -> bool) -> S {
        let mut rx = self.tx.subscribe();
        match rx.wait_for(done).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.snapshot(),
        }
    }
}
