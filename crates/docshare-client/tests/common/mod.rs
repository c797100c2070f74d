//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use docshare_client::{ApiClient, ClientConfig, Session};
use docshare_core::types::{Role, SessionIdentity};
use wiremock::MockServer;

/// Token used by [`logged_in`] sessions.
pub const TOKEN: &str = "test-token";

/// Starts a mock backend and a client pointed at its `/api` root.
pub async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(format!("{}/api", server.uri())).with_timeout(5);
    let client = ApiClient::new(config, Session::in_memory()).expect("client should build");
    (server, client)
}

/// Starts a mock backend with a client already logged in with `roles`.
pub async fn logged_in(roles: &[Role]) -> (MockServer, ApiClient) {
    let (server, client) = setup().await;
    client
        .session()
        .establish(SessionIdentity::new(TOKEN, "alice", roles.iter().copied()))
        .await;
    (server, client)
}

/// Number of requests the mock backend has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
