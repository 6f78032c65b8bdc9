//! Shared fixtures for the mock Airbyte server tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder, MockServer, Request};

use airbyte_provider::testing::ProviderTester;
use airbyte_provider::AirbyteProvider;

pub const WORKSPACE_ID: &str = "b5a5f1d6-8f0e-4a43-9f4b-6b7f0c1e2d3a";
pub const SOURCE_DEFINITION_ID: &str = "1d9f2c3e-0b6a-4c1e-9a0f-2f6c1a7d4e5b";
pub const SOURCE_ID: &str = "7c2e4b1a-3d5f-4e6a-8b9c-0d1e2f3a4b5c";

/// A POST mock for `api/v1/<endpoint>`.
pub fn post(endpoint: &str) -> MockBuilder {
    Mock::given(method("POST")).and(path(format!("/api/v1/{}", endpoint)))
}

/// A tester configured against the mock server.
pub async fn tester(server: &MockServer) -> ProviderTester<AirbyteProvider> {
    airbyte_provider::try_init_logging();
    match ProviderTester::for_host(&server.uri()).await {
        Ok(tester) => tester,
        Err(e) => panic!("provider failed to configure: {}", e),
    }
}

/// Bodies of every request the server received on `endpoint`.
pub async fn bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
    let wanted = format!("/api/v1/{}", endpoint);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r: &&Request| r.url.path() == wanted)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

pub fn workspace(name: &str, notifications: Value) -> Value {
    json!({
        "workspaceId": WORKSPACE_ID,
        "customerId": "0f1e2d3c-4b5a-6978-8a9b-acbdcedf0011",
        "name": name,
        "slug": format!("{}_4c6e", name),
        "initialSetupComplete": false,
        "displaySetupWizard": true,
        "anonymousDataCollection": false,
        "news": false,
        "securityUpdates": false,
        "notifications": notifications,
        "defaultGeography": "auto"
    })
}

pub fn slack(webhook: &str, send_on_success: bool, send_on_failure: bool) -> Value {
    json!({
        "notificationType": "slack",
        "sendOnSuccess": send_on_success,
        "sendOnFailure": send_on_failure,
        "slackConfiguration": {"webhook": webhook}
    })
}

pub fn source_definition(docker_image_tag: &str) -> Value {
    json!({
        "sourceDefinitionId": SOURCE_DEFINITION_ID,
        "name": "custom-source",
        "dockerRepository": "airbyte/source-custom",
        "dockerImageTag": docker_image_tag,
        "documentationUrl": "https://docs.example.com/custom-source",
        "protocolVersion": "0.2.0",
        "releaseStage": "custom",
        "sourceType": "api",
        "resourceRequirements": {
            "default": {"cpu_limit": "2", "memory_limit": "2Gi"}
        }
    })
}

pub fn source(name: &str, configuration: Value) -> Value {
    json!({
        "sourceId": SOURCE_ID,
        "sourceDefinitionId": SOURCE_DEFINITION_ID,
        "workspaceId": WORKSPACE_ID,
        "name": name,
        "sourceName": "custom-source",
        "connectionConfiguration": configuration
    })
}
