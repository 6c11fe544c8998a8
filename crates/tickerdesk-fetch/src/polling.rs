/*
[INPUT]:  An owned AsyncOperation plus a fixed polling interval
[OUTPUT]: Periodic re-execution with supersession, graceful stop semantics
[POS]:    Core primitive - interval-driven consumer of AsyncOperation
[UPDATE]: When changing tick scheduling or teardown ordering
*/

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::operation::{AsyncOperation, OperationState};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives one [`AsyncOperation`] on a fixed interval.
///
/// Ticks are never queued: if the previous tick's invocation is still
/// pending, the next tick fires anyway and supersedes it through the
/// operation's single-active-token rule, so at most one request is live and
/// the older one's result is guaranteed discarded. A failed tick surfaces
/// through the operation's `error` and does not stop the session; the next
/// tick retries.
pub struct PollingSession<T, A, E> {
    operation: AsyncOperation<T, A, E>,
    interval: Duration,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl<T, A, E> PollingSession<T, A, E>
where
    T: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    E: fmt::Display + Send + 'static,
{
    pub fn new(operation: AsyncOperation<T, A, E>, interval: Duration) -> Self {
        Self {
            operation,
            interval,
            shutdown: CancellationToken::new(),
            worker: None,
        }
    }

    /// The owned operation; exposes `cancel`/`reset`/`set_data` and state.
    pub fn operation(&self) -> &AsyncOperation<T, A, E> {
        &self.operation
    }

    /// Subscribe to the owned operation's state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.operation.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        !self.shutdown.is_cancelled()
            && self
                .worker
                .as_ref()
                .is_some_and(|worker| !worker.is_finished())
    }

    /// Start polling: one immediate invocation, then one per interval.
    ///
    /// A session starts at most once; calling `start` again (or after
    /// `stop`) does nothing.
    pub fn start(&mut self, args: A) {
        if self.worker.is_some() || self.shutdown.is_cancelled() {
            return;
        }

        let operation = self.operation.clone();
        let shutdown = self.shutdown.clone();
        let interval = self.interval;

        self.worker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // Biased so a pending shutdown always beats a ready tick; no
                // tick fires once teardown has begun.
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        debug!("polling session shutdown requested");
                        break;
                    }
                    _ = ticker.tick() => {
                        let _ = operation.execute(args.clone());
                    }
                }
            }

            // The worker is the only caller of execute, so this cancel is
            // ordered after the last tick it may have started, even when a
            // tick raced the shutdown signal on another thread.
            operation.cancel();
        }));
    }

    /// Stop ticking, then abort the in-flight invocation, in that order.
    ///
    /// The cancel here is best-effort for immediate responsiveness; the
    /// worker repeats it after its loop exits to cover a tick it had
    /// already chosen when the shutdown landed.
    pub fn stop(&self) {
        self.shutdown.cancel();
        self.operation.cancel();
    }

    /// Stop and wait for the worker to exit, bounded by a shutdown timeout.
    pub async fn shutdown_and_wait(&mut self) {
        self.stop();
        if let Some(worker) = self.worker.take() {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, worker).await {
                Ok(Ok(())) => debug!("polling worker stopped"),
                Ok(Err(err)) => warn!(error = %err, "polling worker panicked"),
                Err(_) => warn!("polling worker did not stop within timeout"),
            }
        }
    }
}

impl<T, A, E> Drop for PollingSession<T, A, E> {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.operation.cancel();
    }
}
