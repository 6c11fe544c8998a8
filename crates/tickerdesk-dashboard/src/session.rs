/*
[INPUT]:  A shared DashboardClient plus per-session poll intervals
[OUTPUT]: Long-lived polling sessions for account, environment, watchlist, screener
[POS]:    Consumer layer - wires backend endpoints into polling sessions
[UPDATE]: When adding sessions or changing per-session failure behavior
*/

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use tickerdesk_adapter::{
    AccountStatus, ClientError, DashboardClient, EnvironmentInfo, Quote, ScreenerRow,
};
use tickerdesk_fetch::{
    AsyncOperation, CancellationToken, OperationConfig, OperationState, PollingSession,
};

/// Account-status session.
///
/// On a real fetch failure the stale snapshot is replaced with an explicit
/// disconnected placeholder, so the dashboard never shows a "connected"
/// account it cannot reach. That swap is this consumer's decision; the
/// underlying operation leaves `data` untouched on error.
pub struct AccountSession {
    session: PollingSession<AccountStatus, (), ClientError>,
    shutdown: CancellationToken,
    guard: Option<JoinHandle<()>>,
}

impl AccountSession {
    pub fn new(client: Arc<DashboardClient>, interval: Duration) -> Self {
        let operation = AsyncOperation::with_config(
            move |_: (), token: CancellationToken| {
                let client = Arc::clone(&client);
                async move { client.account_status(&token).await }
            },
            OperationConfig {
                initial_data: Some(AccountStatus::disconnected()),
                is_cancellation: ClientError::is_cancellation,
                ..OperationConfig::default()
            },
        );

        let shutdown = CancellationToken::new();
        let guard = tokio::spawn(placeholder_guard(
            operation.clone(),
            operation.subscribe(),
            shutdown.clone(),
        ));

        Self {
            session: PollingSession::new(operation, interval),
            shutdown,
            guard: Some(guard),
        }
    }

    pub fn start(&mut self) {
        self.session.start(());
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState<AccountStatus>> {
        self.session.subscribe()
    }

    pub fn state(&self) -> OperationState<AccountStatus> {
        self.session.operation().state()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
        self.session.stop();
    }

    pub async fn shutdown_and_wait(&mut self) {
        self.shutdown.cancel();
        self.session.shutdown_and_wait().await;
        if let Some(guard) = self.guard.take() {
            let _ = guard.await;
        }
    }
}

impl Drop for AccountSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Swaps in the disconnected placeholder whenever an error lands while the
/// snapshot still claims a connected account.
async fn placeholder_guard(
    operation: AsyncOperation<AccountStatus, (), ClientError>,
    mut rx: watch::Receiver<OperationState<AccountStatus>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let needs_placeholder = {
                    let state = rx.borrow_and_update();
                    state.error.is_some()
                        && state.data.as_ref().is_none_or(|status| status.connected)
                };
                if needs_placeholder {
                    debug!("account fetch failed; swapping in disconnected placeholder");
                    operation.set_data(AccountStatus::disconnected());
                }
            }
        }
    }
}

/// Environment session: stale data stays visible through transient errors.
pub fn environment_session(
    client: Arc<DashboardClient>,
    interval: Duration,
) -> PollingSession<EnvironmentInfo, (), ClientError> {
    let operation = AsyncOperation::with_config(
        move |_: (), token: CancellationToken| {
            let client = Arc::clone(&client);
            async move { client.environment(&token).await }
        },
        OperationConfig {
            is_cancellation: ClientError::is_cancellation,
            ..OperationConfig::default()
        },
    );
    PollingSession::new(operation, interval)
}

/// Watchlist quotes session; `start` takes the symbol list as its argument.
pub fn watchlist_session(
    client: Arc<DashboardClient>,
    interval: Duration,
) -> PollingSession<Vec<Quote>, Vec<String>, ClientError> {
    let operation = AsyncOperation::with_config(
        move |symbols: Vec<String>, token: CancellationToken| {
            let client = Arc::clone(&client);
            async move { client.quotes(&symbols, &token).await }
        },
        OperationConfig {
            initial_data: Some(Vec::new()),
            is_cancellation: ClientError::is_cancellation,
            ..OperationConfig::default()
        },
    );
    PollingSession::new(operation, interval)
}

/// Mean-reversion screener session; `start` takes the row limit.
pub fn screener_session(
    client: Arc<DashboardClient>,
    interval: Duration,
) -> PollingSession<Vec<ScreenerRow>, Option<u32>, ClientError> {
    let operation = AsyncOperation::with_config(
        move |limit: Option<u32>, token: CancellationToken| {
            let client = Arc::clone(&client);
            async move { client.screener_rows(limit, &token).await }
        },
        OperationConfig {
            initial_data: Some(Vec::new()),
            is_cancellation: ClientError::is_cancellation,
            ..OperationConfig::default()
        },
    );
    PollingSession::new(operation, interval)
}
