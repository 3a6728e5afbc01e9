//! Counting running effects
//!
//! Every running effect holds an [`InFlight`] guard. The guard bumps a
//! `watch` counter when created and lowers it when dropped, so a waiter only
//! has to wait for the counter to read zero. A panicking effect still drops
//! its guard.

use crate::error::StoreError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Shared count of running effects
#[derive(Clone)]
pub(crate) struct Counter(Arc<watch::Sender<usize>>);

impl Counter {
    pub(crate) fn new() -> Self {
        Self(Arc::new(watch::Sender::new(0)))
    }

    pub(crate) fn current(&self) -> usize {
        *self.0.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<usize> {
        self.0.subscribe()
    }

    fn increment(&self) {
        self.0.send_modify(|n| *n += 1);
    }

    fn decrement(&self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Held by a running effect; counts it against its action and the store
pub(crate) struct InFlight {
    counters: [Counter; 2],
}

impl InFlight {
    pub(crate) fn start(action: &Counter, store: &Counter) -> Self {
        action.increment();
        store.increment();
        Self {
            counters: [action.clone(), store.clone()],
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        for counter in &self.counters {
            counter.decrement();
        }
    }
}

/// Waits until `rx` reads zero; a closed channel counts as done
pub(crate) async fn until_idle(rx: &mut watch::Receiver<usize>) {
    let _ = rx.wait_for(|n| *n == 0).await;
}

/// Tracks the effects started by one [`Store::send`](crate::Store::send)
///
/// A request is an effect, so waiting on the handle of `Submit` returns once
/// the reservation outcome has been reduced.
///
/// ```ignore
/// let mut handle = store.send(FormAction::Submit).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    pending: watch::Receiver<usize>,
}

impl EffectHandle {
    pub(crate) fn tracking(counter: &Counter) -> Self {
        Self {
            pending: counter.subscribe(),
        }
    }

    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        Self::tracking(&Counter::new())
    }

    /// Effects of this action still running
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Wait until every effect of this action has finished
    pub async fn wait(&mut self) {
        until_idle(&mut self.pending).await;
    }

    /// [`wait`](Self::wait), bounded
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running after `timeout`.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending", &self.pending())
            .finish()
    }
}
