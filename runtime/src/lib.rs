//! # Tido Runtime
//!
//! Runtime implementation for tido's reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back
//!   to reducers
//!
//! ## Example
//!
//! ```ignore
//! use tido_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tido_core::effect::Effect;
use tido_core::reducer::Reducer;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// An effect execution failed
        ///
        /// This error is logged but does not halt the store.
        /// Effects are fire-and-forget operations.
        #[error("Effect execution failed: {0}")]
        EffectFailed(String),

        /// A task join error occurred during effect execution
        ///
        /// This typically means a spawned task panicked.
        #[error("Task failed during effect execution: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),

        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown
        /// initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effect completion
        ///
        /// Returned by [`crate::EffectHandle::wait_with_timeout`] when the
        /// timeout expires before the effect task finishes.
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

use error::StoreError;

/// Handle for the effect task started by a [`Store::send`] call.
///
/// `send()` returns after *starting* effect execution, not after
/// completion. The handle lets callers that care about completion wait
/// for it; callers that do not can drop the handle (the task keeps
/// running).
#[derive(Debug)]
pub struct EffectHandle {
    handle: Option<JoinHandle<()>>,
}

impl EffectHandle {
    /// Handle for a send that produced no effects.
    pub(crate) const fn noop() -> Self {
        Self { handle: None }
    }

    pub(crate) const fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Wait for the effect task (and all feedback it spawns inline) to
    /// finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskJoinError`] if the effect task panicked.
    pub async fn wait(self) -> Result<(), StoreError> {
        if let Some(handle) = self.handle {
            handle.await?;
        }
        Ok(())
    }

    /// Wait for the effect task with an upper bound.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`] if the timeout expires first
    /// - [`StoreError::TaskJoinError`] if the effect task panicked
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        match self.handle {
            None => Ok(()),
            Some(handle) => {
                let joined = tokio::time::timeout(timeout, handle)
                    .await
                    .map_err(|_| StoreError::Timeout)?;
                joined?;
                Ok(())
            },
        }
    }
}

/// Guard that decrements an atomic counter on drop.
///
/// Ensures the pending-effect counter is always decremented, even if the
/// effect panics.
struct CounterGuard(Arc<AtomicUsize>);

impl Drop for CounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use futures::future::{BoxFuture, join_all};

    use super::{
        Arc, AtomicBool, AtomicUsize, CounterGuard, Duration, Effect, EffectHandle, Ordering,
        Reducer, RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects in a spawned task
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// The reducer runs synchronously while holding the write lock, so
        /// concurrent `send()` calls serialize at the reducer level. The
        /// returned [`EffectHandle`] resolves when the spawned effect task
        /// (including feedback actions it dispatches) finishes.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is
        /// shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(StoreError::ShutdownInProgress);
            }

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            if effects.iter().all(Effect::is_none) {
                return Ok(EffectHandle::noop());
            }

            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = CounterGuard(Arc::clone(&self.pending_effects));

            let store = self.clone();
            let handle = tokio::spawn(async move {
                let _guard = guard;
                for effect in effects {
                    store.execute(effect).await;
                }
            });

            Ok(EffectHandle::new(handle))
        }

        /// Read a value out of the current state
        ///
        /// Takes a closure so callers can project exactly what they need
        /// (often `Clone::clone` for a full snapshot) without holding the
        /// read lock afterwards.
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Number of effect tasks currently running.
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for
        /// pending effect tasks to drain.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// before all pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(100);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout with effects still running"
                    );
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(
                    pending_effects = pending,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Waiting for effects to complete"
                );

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute one effect description.
        ///
        /// Boxed so `Parallel`/`Sequential` nesting and the feedback loop
        /// can recurse; the future owns a clone of the store and borrows
        /// nothing.
        fn execute(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Parallel(effects) => {
                        join_all(effects.into_iter().map(|e| store.execute(e))).await;
                    },
                    Effect::Sequential(effects) => {
                        for e in effects {
                            store.execute(e).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        store.feedback(*action).await;
                    },
                    Effect::Future(future) => {
                        if let Some(action) = future.await {
                            store.feedback(action).await;
                        }
                    },
                }
            })
        }

        /// Feed an effect-produced action back through the reducer.
        ///
        /// Feedback bypasses the shutdown check: in-flight effects are
        /// allowed to land their results while the store drains.
        async fn feedback(&self, action: A) {
            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };
            for effect in effects {
                self.execute(effect).await;
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use std::time::Duration;

    use tido_core::SmallVec;
    use tido_core::effect::{Effect, EffectBuf};
    use tido_core::reducer::Reducer;
    use tido_core::smallvec;

    use super::Store;
    use super::error::StoreError;

    #[derive(Clone, Debug, Default)]
    struct CounterState {
        count: i64,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Increment,
        IncrementLater(Duration),
        IncrementViaFuture,
    }

    #[derive(Clone)]
    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> EffectBuf<Self::Action> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    SmallVec::new()
                },
                CounterAction::IncrementLater(duration) => smallvec![Effect::Delay {
                    duration,
                    action: Box::new(CounterAction::Increment),
                }],
                CounterAction::IncrementViaFuture => smallvec![Effect::Future(Box::pin(
                    async { Some(CounterAction::Increment) }
                ))],
            }
        }
    }

    #[tokio::test]
    async fn send_updates_state() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        store.send(CounterAction::Increment).await.unwrap();
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn send_without_effects_returns_noop_handle() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let handle = store.send(CounterAction::Increment).await.unwrap();
        handle.wait().await.unwrap();
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn delay_effect_feeds_action_back() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let handle = store
            .send(CounterAction::IncrementLater(Duration::from_millis(10)))
            .await
            .unwrap();
        handle.wait().await.unwrap();
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let handle = store.send(CounterAction::IncrementViaFuture).await.unwrap();
        handle.wait().await.unwrap();
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn wait_with_timeout_times_out() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let handle = store
            .send(CounterAction::IncrementLater(Duration::from_secs(5)))
            .await
            .unwrap();
        let result = handle.wait_with_timeout(Duration::from_millis(10)).await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn send_after_shutdown_is_rejected() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        let result = store.send(CounterAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }
}
