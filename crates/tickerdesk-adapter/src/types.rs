/*
[INPUT]:  JSON payloads from the dashboard backend
[OUTPUT]: Typed models for account, environment, quotes, and screener rows
[POS]:    Data layer - wire models shared by all endpoints
[UPDATE]: When backend response shapes change
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Broker connection and balance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub connected: bool,
    #[serde(default)]
    pub broker: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub equity: Decimal,
    #[serde(default)]
    pub buying_power: Decimal,
    #[serde(default)]
    pub cash: Decimal,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccountStatus {
    /// Placeholder consumers swap in when the backend is unreachable, so a
    /// stale "connected" snapshot is never shown during an outage.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            broker: String::new(),
            account_id: String::new(),
            equity: Decimal::ZERO,
            buying_power: Decimal::ZERO,
            cash: Decimal::ZERO,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Paper,
    Live,
}

/// Backend trading environment description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub mode: TradingMode,
    #[serde(default)]
    pub data_provider: String,
    #[serde(default)]
    pub version: String,
}

/// Latest quote for one watchlist symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub last: Decimal,
    #[serde(default)]
    pub change_percent: Option<Decimal>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One row of the mean-reversion screener feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerRow {
    pub rank: u32,
    pub symbol: String,
    /// Mean-reversion score; higher means more stretched from the mean.
    pub score: Decimal,
    pub last: Decimal,
    #[serde(default)]
    pub deviation_percent: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_placeholder_is_not_connected() {
        let status = AccountStatus::disconnected();
        assert!(!status.connected);
        assert_eq!(status.equity, Decimal::ZERO);
    }

    #[test]
    fn account_status_deserializes_with_missing_fields() {
        let status: AccountStatus =
            serde_json::from_str(r#"{"connected": true, "broker": "alpaca"}"#).unwrap();
        assert!(status.connected);
        assert_eq!(status.broker, "alpaca");
        assert_eq!(status.buying_power, Decimal::ZERO);
    }

    #[test]
    fn trading_mode_uses_lowercase_wire_names() {
        let info: EnvironmentInfo =
            serde_json::from_str(r#"{"mode": "paper", "data_provider": "polygon"}"#).unwrap();
        assert_eq!(info.mode, TradingMode::Paper);
    }
}
