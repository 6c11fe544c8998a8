/*
[INPUT]:  Per-call cancellation token
[OUTPUT]: Account status and trading environment snapshots
[POS]:    HTTP layer - account/environment endpoints
[UPDATE]: When adding account endpoints or changing their paths
*/

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::client::DashboardClient;
use crate::error::Result;
use crate::types::{AccountStatus, EnvironmentInfo};

impl DashboardClient {
    /// Query broker connection state and balances
    ///
    /// GET /api/account/status
    pub async fn account_status(&self, token: &CancellationToken) -> Result<AccountStatus> {
        let builder = self.request(Method::GET, "/api/account/status")?;
        self.send_json(builder, token).await
    }

    /// Query the backend trading environment
    ///
    /// GET /api/environment
    pub async fn environment(&self, token: &CancellationToken) -> Result<EnvironmentInfo> {
        let builder = self.request(Method::GET, "/api/environment")?;
        self.send_json(builder, token).await
    }
}
