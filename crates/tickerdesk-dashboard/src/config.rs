/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed dashboard configuration
[POS]:    Configuration layer - backend target and polling cadence
[UPDATE]: When adding new configuration options
*/

use serde::{Deserialize, Serialize};

/// Top-level configuration for the dashboard data layer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Polling cadence per session
    #[serde(default)]
    pub polling: PollingConfig,
    /// Watchlist symbols to poll quotes for
    #[serde(default)]
    pub watchlist: Vec<String>,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the dashboard backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional bearer token for authenticated backends
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
        }
    }
}

/// Poll intervals, in seconds, for each long-lived session
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    #[serde(default = "default_account_interval")]
    pub account_interval_secs: u64,
    #[serde(default = "default_environment_interval")]
    pub environment_interval_secs: u64,
    #[serde(default = "default_watchlist_interval")]
    pub watchlist_interval_secs: u64,
    #[serde(default = "default_screener_interval")]
    pub screener_interval_secs: u64,
    /// Row cap for the mean-reversion screener feed
    #[serde(default = "default_screener_limit")]
    pub screener_limit: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            account_interval_secs: default_account_interval(),
            environment_interval_secs: default_environment_interval(),
            watchlist_interval_secs: default_watchlist_interval(),
            screener_interval_secs: default_screener_interval(),
            screener_limit: default_screener_limit(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8420".to_string()
}

fn default_account_interval() -> u64 {
    5
}

fn default_environment_interval() -> u64 {
    60
}

fn default_watchlist_interval() -> u64 {
    2
}

fn default_screener_interval() -> u64 {
    10
}

fn default_screener_limit() -> u32 {
    20
}

impl DashboardConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
