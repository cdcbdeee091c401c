#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::sync::Once;

use httpmock::MockServer;
use puter::{Puter, PuterHttpClient};

static TRACING_INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("TRACING").unwrap_or_else(|_| "info".to_string()))
            // Use with_test_writer to ensure logs are captured correctly by the test runner.
            .with_test_writer()
            .init();
    });
}

/// A facade pointed at the mock server, already signed in as `token-1`.
pub fn signed_in_sdk(server: &MockServer) -> Puter {
    init_tracing();
    let client = PuterHttpClient::builder()
        .api_url(server.base_url())
        .build()
        .unwrap();
    Puter::with_client(client, Some("token-1".to_string()))
}

/// A facade pointed at the mock server, holding no token.
pub fn anonymous_sdk(server: &MockServer) -> Puter {
    init_tracing();
    let client = PuterHttpClient::builder()
        .api_url(server.base_url())
        .build()
        .unwrap();
    Puter::with_client(client, None)
}
