//! Helpers shared by the mock API tests

use std::time::Duration;

use azion_provider::{AzionProvider, ProviderConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Provider pointed at the mock server for both APIs, with fast retries
pub fn provider_for(server: &MockServer) -> AzionProvider {
    let config = ProviderConfig::default()
        .with_token(TEST_TOKEN)
        .with_base_url(server.uri())
        .with_variables_url(server.uri())
        .with_retry(2, Duration::from_millis(10));
    AzionProvider::new(&config).expect("provider")
}

/// Wrap an object the way single-object endpoints answer
pub fn results(body: Value) -> Value {
    json!({ "results": body })
}

#[allow(dead_code)]
pub fn page(items: Vec<Value>, total_pages: i64) -> Value {
    json!({
        "count": items.len(),
        "total_pages": total_pages,
        "results": items,
    })
}
