/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Running polling sessions with snapshot logging and graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tickerdesk_adapter::{ClientConfig, Credentials, DashboardClient};
use tickerdesk_dashboard::session::{
    AccountSession, environment_session, screener_session, watchlist_session,
};
use tickerdesk_dashboard::DashboardConfig;

const SNAPSHOT_LOG_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "tickerdesk", version, about = "Trading dashboard data layer")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = %args.config_path.display(),
        dry_run = args.dry_run,
        "starting tickerdesk"
    );

    let config = load_config(&args.config_path)?;
    info!(
        base_url = %config.backend.base_url,
        watchlist_len = config.watchlist.len(),
        "configuration loaded"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let client = Arc::new(build_client(&config)?);
    let polling = &config.polling;

    // Sessions are constructed and started exactly once for the process
    // lifetime; teardown below is the only other lifecycle event.
    let mut account = AccountSession::new(
        Arc::clone(&client),
        Duration::from_secs(polling.account_interval_secs),
    );
    let mut environment = environment_session(
        Arc::clone(&client),
        Duration::from_secs(polling.environment_interval_secs),
    );
    let mut watchlist = watchlist_session(
        Arc::clone(&client),
        Duration::from_secs(polling.watchlist_interval_secs),
    );
    let mut screener = screener_session(
        Arc::clone(&client),
        Duration::from_secs(polling.screener_interval_secs),
    );

    account.start();
    environment.start(());
    watchlist.start(config.watchlist.clone());
    screener.start(Some(polling.screener_limit));
    info!("sessions started");

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let mut ticker = tokio::time::interval(SNAPSHOT_LOG_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let account_state = account.state();
                let connected = account_state
                    .data
                    .as_ref()
                    .is_some_and(|status| status.connected);
                info!(
                    connected,
                    account_error = account_state.error.as_deref().unwrap_or(""),
                    quotes = watchlist
                        .operation()
                        .state()
                        .data
                        .map(|quotes| quotes.len())
                        .unwrap_or(0),
                    screener_rows = screener
                        .operation()
                        .state()
                        .data
                        .map(|rows| rows.len())
                        .unwrap_or(0),
                    "snapshot"
                );
            }
        }
    }
    info!("shutdown signal received");

    account.shutdown_and_wait().await;
    environment.shutdown_and_wait().await;
    watchlist.shutdown_and_wait().await;
    screener.shutdown_and_wait().await;
    info!("sessions shutdown complete");

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<DashboardConfig> {
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    DashboardConfig::from_file(path_str).context("load config")
}

fn build_client(config: &DashboardConfig) -> Result<DashboardClient> {
    let mut client = DashboardClient::with_config(ClientConfig {
        base_url: config.backend.base_url.clone(),
        ..ClientConfig::default()
    })
    .context("build backend client")?;

    if let Some(api_token) = &config.backend.api_token {
        client.set_credentials(Credentials {
            api_token: api_token.clone(),
        });
    }

    Ok(client)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
