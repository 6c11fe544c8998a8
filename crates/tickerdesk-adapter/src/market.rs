/*
[INPUT]:  Symbol lists / row limits and per-call cancellation token
[OUTPUT]: Watchlist quotes and mean-reversion screener rows
[POS]:    HTTP layer - market data endpoints
[UPDATE]: When adding market endpoints or changing query parameters
*/

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::client::DashboardClient;
use crate::error::Result;
use crate::types::{Quote, ScreenerRow};

impl DashboardClient {
    /// Query latest quotes for a set of watchlist symbols
    ///
    /// GET /api/quotes?symbols={a,b,c}
    pub async fn quotes(
        &self,
        symbols: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<Quote>> {
        let endpoint = if symbols.is_empty() {
            "/api/quotes".to_string()
        } else {
            format!("/api/quotes?symbols={}", symbols.join(","))
        };

        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder, token).await
    }

    /// Query the current mean-reversion screener rows
    ///
    /// GET /api/screener/live?limit={limit}
    pub async fn screener_rows(
        &self,
        limit: Option<u32>,
        token: &CancellationToken,
    ) -> Result<Vec<ScreenerRow>> {
        let endpoint = if let Some(l) = limit {
            format!("/api/screener/live?limit={}", l)
        } else {
            "/api/screener/live".to_string()
        };

        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder, token).await
    }
}
