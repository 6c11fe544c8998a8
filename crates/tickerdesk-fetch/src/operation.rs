/*
[INPUT]:  A caller-supplied async operation `(args, token) -> Result<T, E>`
[OUTPUT]: Latest `{data, loading, error}` snapshots via `watch`, last invocation wins
[POS]:    Core primitive - cancellation-aware async operation state machine
[UPDATE]: When changing supersession, settlement, or error classification rules
*/

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::token::TokenSlot;

/// Fallback error text for failures whose `Display` output is empty.
const GENERIC_FAILURE: &str = "operation failed";

/// Snapshot of one operation site, published on every accepted transition.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T> {
    /// Last successfully produced value, or the configured initial value.
    /// Only a non-stale success ever writes it; errors leave it untouched.
    pub data: Option<T>,
    /// True strictly between invocation start and the settlement (or explicit
    /// cancel) belonging to the currently active invocation.
    pub loading: bool,
    /// Failure text from the most recent non-stale, non-cancelled failure;
    /// cleared at the start of every invocation.
    pub error: Option<String>,
}

type OperationFn<T, A, E> =
    Arc<dyn Fn(A, CancellationToken) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Construction options for [`AsyncOperation`].
pub struct OperationConfig<T, E> {
    /// Value `data` starts at and returns to on [`AsyncOperation::reset`].
    pub initial_data: Option<T>,
    /// Fired on every accepted (non-stale) success.
    pub on_success: Option<Arc<dyn Fn(&T) + Send + Sync>>,
    /// Fired on every accepted real failure; never fired for cancellations.
    pub on_error: Option<Arc<dyn Fn(&E) + Send + Sync>>,
    /// Classifies operation rejections that signal cooperative cancellation.
    /// Such rejections are discarded silently instead of populating `error`.
    pub is_cancellation: fn(&E) -> bool,
}

impl<T, E> Default for OperationConfig<T, E> {
    fn default() -> Self {
        Self {
            initial_data: None,
            on_success: None,
            on_error: None,
            is_cancellation: |_| false,
        }
    }
}

impl<T: Clone, E> Clone for OperationConfig<T, E> {
    fn clone(&self) -> Self {
        Self {
            initial_data: self.initial_data.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            is_cancellation: self.is_cancellation,
        }
    }
}

/// Runs a supplied async operation and tracks its `{data, loading, error}`
/// state so that only the most recently issued invocation can update it.
///
/// Every call to [`execute`](Self::execute) first cancels the token of any
/// still-pending invocation; that invocation's eventual settlement is then
/// stale and is discarded at the state-application boundary. Correctness does
/// not depend on the operation honoring its token; a late arrival from an
/// operation that ignored cancellation is discarded the same way.
///
/// Clones share the same state and token slot, so a clone handed to a worker
/// task drives the same operation site.
pub struct AsyncOperation<T, A, E> {
    op: OperationFn<T, A, E>,
    config: OperationConfig<T, E>,
    state_tx: watch::Sender<OperationState<T>>,
    slot: Arc<Mutex<TokenSlot>>,
}

impl<T: Clone, A, E> Clone for AsyncOperation<T, A, E> {
    fn clone(&self) -> Self {
        Self {
            op: Arc::clone(&self.op),
            config: self.config.clone(),
            state_tx: self.state_tx.clone(),
            slot: Arc::clone(&self.slot),
        }
    }
}

enum Settlement<T, E> {
    TokenCancelled,
    Settled(Result<T, E>),
}

impl<T, A, E> AsyncOperation<T, A, E> {
    /// Subscribe to state snapshots; the receiver always holds the latest.
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.state_tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state_tx.borrow().loading
    }

    /// Abort the pending invocation, if any, and clear `loading` immediately.
    /// `data` and `error` are left untouched. Idempotent.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        if slot.cancel_active() {
            self.state_tx.send_modify(|state| state.loading = false);
        }
    }

    /// Assign `data` directly, bypassing the operation (optimistic updates).
    /// Does not touch `loading`, `error`, or the pending invocation.
    pub fn set_data(&self, value: T) {
        self.state_tx.send_modify(|state| state.data = Some(value));
    }
}

impl<T: Clone, A, E> AsyncOperation<T, A, E> {
    /// Current state snapshot.
    pub fn state(&self) -> OperationState<T> {
        self.state_tx.borrow().clone()
    }

    /// Cancel, then restore `data` to the configured initial value and clear
    /// `error`.
    pub fn reset(&self) {
        let initial = self.config.initial_data.clone();
        let mut slot = lock(&self.slot);
        slot.cancel_active();
        self.state_tx.send_modify(|state| {
            state.data = initial;
            state.error = None;
            state.loading = false;
        });
    }
}

impl<T, A, E> AsyncOperation<T, A, E>
where
    T: Clone + Send + Sync + 'static,
    E: fmt::Display + Send + 'static,
{
    pub fn new<F, Fut>(op: F) -> Self
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::with_config(op, OperationConfig::default())
    }

    pub fn with_config<F, Fut>(op: F, config: OperationConfig<T, E>) -> Self
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (state_tx, _rx) = watch::channel(OperationState {
            data: config.initial_data.clone(),
            loading: false,
            error: None,
        });

        Self {
            op: Arc::new(move |args, token| op(args, token).boxed()),
            config,
            state_tx,
            slot: Arc::new(Mutex::new(TokenSlot::default())),
        }
    }

    /// Start one invocation, superseding any still-pending one.
    ///
    /// Never fails from the caller's perspective: real failures surface via
    /// the `error` field and `on_error`, cancellations surface nowhere.
    /// Awaiting the returned handle yields `Some(value)` when this
    /// invocation's success was accepted, `None` on error or discard; the
    /// handle may also be dropped outright (fire-and-forget).
    pub fn execute(&self, args: A) -> JoinHandle<Option<T>>
    where
        A: Send + 'static,
    {
        // Supersession and the `loading` transition publish under one lock,
        // so they are atomic with respect to any concurrent settlement.
        let invocation = {
            let mut slot = lock(&self.slot);
            let invocation = slot.begin();
            self.state_tx.send_modify(|state| {
                state.loading = true;
                state.error = None;
            });
            invocation
        };
        debug!(generation = invocation.generation, "operation invoked");

        let fut = (self.op)(args, invocation.token.clone());
        let slot = Arc::clone(&self.slot);
        let state_tx = self.state_tx.clone();
        let on_success = self.config.on_success.clone();
        let on_error = self.config.on_error.clone();
        let is_cancellation = self.config.is_cancellation;
        let token = invocation.token;
        let generation = invocation.generation;

        tokio::spawn(async move {
            // Racing against the token makes a superseded or cancelled
            // invocation settle promptly even when the operation itself
            // never observes its token.
            let settlement = tokio::select! {
                _ = token.cancelled() => Settlement::TokenCancelled,
                result = fut => Settlement::Settled(result),
            };

            // The staleness check and the state publication hold the slot
            // lock together: once a newer invocation has begun, this
            // settlement can no longer pass the check, and once this
            // settlement has passed the check, a newer invocation cannot
            // begin until its state is published. The lock is released
            // before any user callback runs.
            let mut guard = lock(&slot);
            let current = guard.finish_if_current(generation);

            match settlement {
                Settlement::TokenCancelled => {
                    if current {
                        state_tx.send_modify(|state| state.loading = false);
                    }
                    drop(guard);
                    debug!(generation, "invocation cancelled");
                    None
                }
                Settlement::Settled(Ok(value)) => {
                    if !current {
                        drop(guard);
                        debug!(generation, "stale success discarded");
                        return None;
                    }
                    state_tx.send_modify(|state| {
                        state.data = Some(value.clone());
                        state.loading = false;
                    });
                    drop(guard);
                    if let Some(callback) = on_success {
                        callback(&value);
                    }
                    Some(value)
                }
                Settlement::Settled(Err(err)) if is_cancellation(&err) => {
                    if current {
                        state_tx.send_modify(|state| state.loading = false);
                    }
                    drop(guard);
                    debug!(generation, "cancellation-shaped rejection discarded");
                    None
                }
                Settlement::Settled(Err(err)) => {
                    if !current {
                        drop(guard);
                        debug!(generation, error = %err, "stale failure discarded");
                        return None;
                    }
                    let message = display_or_fallback(&err);
                    state_tx.send_modify(|state| {
                        state.error = Some(message.clone());
                        state.loading = false;
                    });
                    drop(guard);
                    debug!(generation, error = %message, "invocation failed");
                    if let Some(callback) = on_error {
                        callback(&err);
                    }
                    None
                }
            }
        })
    }
}

fn lock(slot: &Mutex<TokenSlot>) -> MutexGuard<'_, TokenSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn display_or_fallback(err: &impl fmt::Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}
