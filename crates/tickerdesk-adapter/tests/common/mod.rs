/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

use wiremock::MockServer;

use tickerdesk_adapter::{ClientConfig, DashboardClient};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Build a client pointed at the mock server
pub fn client_for(server: &MockServer) -> DashboardClient {
    DashboardClient::with_config(ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    })
    .expect("client builds against mock server uri")
}
