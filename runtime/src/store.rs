//! The [`Store`]: one owner for state, every transition through its reducer

use crate::error::StoreError;
use crate::handle::{Counter, EffectHandle, InFlight, until_idle};
use room_desk_core::{effect::Effect, reducer::Reducer};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, broadcast};

/// Slots kept for observers that fall behind
const DEFAULT_ACTION_BUFFER: usize = 16;

type Running = Pin<Box<dyn Future<Output = ()> + Send>>;

struct Inner<S, A, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    closed: AtomicBool,
    running: Counter,
    observed: broadcast::Sender<A>,
}

/// Owns the form state and runs the effects its reducer asks for
///
/// Operator actions and request outcomes take the same write lock, so two
/// transitions never interleave. Cloning is cheap and every clone drives the
/// same state.
pub struct Store<S, A, E, R> {
    inner: Arc<Inner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// A store starting from `initial_state`
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, DEFAULT_ACTION_BUFFER)
    }

    /// Like [`new`](Self::new), keeping `capacity` actions for slow observers
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (observed, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                closed: AtomicBool::new(false),
                running: Counter::new(),
                observed,
            }),
        }
    }

    /// Reduce `action`, then start the effects it returned
    ///
    /// The returned handle waits on those effects only. Observers hear about
    /// the action after its new state is readable.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] once [`shutdown`](Self::shutdown) was called.
    #[tracing::instrument(skip_all, name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.inner.closed.load(Ordering::Acquire) {
            tracing::warn!("Store closed, action refused");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }
        metrics::counter!("store.actions.total").increment(1);

        let copy = action.clone();
        let effects = {
            let mut state = self.inner.state.write().await;
            let started = Instant::now();
            let effects = tracing::debug_span!("reduce").in_scope(|| {
                self.inner
                    .reducer
                    .reduce(&mut state, action, &self.inner.environment)
            });
            metrics::histogram!("store.reducer.duration_seconds")
                .record(started.elapsed().as_secs_f64());
            effects
        };
        let _ = self.inner.observed.send(copy);

        let own = Counter::new();
        let handle = EffectHandle::tracking(&own);
        for effect in effects {
            if effect.is_noop() {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                continue;
            }
            let guard = InFlight::start(&own, &self.inner.running);
            let run = self.clone().run(effect);
            tokio::spawn(async move {
                run.await;
                drop(guard);
            });
        }
        tracing::trace!(pending = handle.pending(), "Action reduced");
        Ok(handle)
    }

    /// Runs one effect to completion, feeding any produced action back in
    fn run(self, effect: Effect<A>) -> Running {
        Box::pin(async move {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(future) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let Some(action) = future.await else {
                        return;
                    };
                    if let Err(error) = self.send(action).await {
                        tracing::warn!(%error, "Effect result dropped");
                    }
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    let tasks: Vec<_> = effects
                        .into_iter()
                        .map(|effect| tokio::spawn(self.clone().run(effect)))
                        .collect();
                    for task in tasks {
                        if let Err(error) = task.await {
                            tracing::error!(%error, "Parallel effect panicked");
                        }
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    for effect in effects {
                        self.clone().run(effect).await;
                    }
                },
            }
        })
    }

    /// Read state through `f` under the read lock
    ///
    /// ```ignore
    /// let rows = store.state(|s| s.selections.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&*self.inner.state.read().await)
    }

    /// Every action reduced from now on
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.inner.observed.subscribe()
    }

    /// The environment handed to the reducer
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.inner.environment
    }

    /// Refuse new actions and wait for running effects
    ///
    /// An effect that finishes after this call cannot feed its action back.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] with the number of effects still running
    /// after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.inner.closed.store(true, Ordering::Release);
        metrics::counter!("store.shutdown.initiated").increment(1);
        tracing::info!(running = self.inner.running.current(), "Store closing");

        let mut idle = self.inner.running.subscribe();
        if tokio::time::timeout(timeout, until_idle(&mut idle)).await.is_err() {
            let left = self.inner.running.current();
            tracing::error!(left, "Store closed with effects still running");
            metrics::counter!("store.shutdown.timeout").increment(1);
            return Err(StoreError::ShutdownTimeout(left));
        }

        tracing::info!("Store closed");
        Ok(())
    }
}
