//! Source resource against a mock Airbyte server.

mod common;

use common::{bodies, post, source, tester, SOURCE_DEFINITION_ID, SOURCE_ID, WORKSPACE_ID};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::body_json;
use wiremock::{MockServer, ResponseTemplate};

use airbyte_provider::testing::{assert_plan_creates, assert_plan_no_changes, assert_plan_replaces};
use airbyte_provider::ProviderError;

fn connection() -> Value {
    json!({
        "host": "db.internal",
        "port": 5432,
        "database": "analytics",
        "replication_method": {"method": "CDC", "replication_slot": "airbyte_slot"},
        "schemas": ["public", "sales"]
    })
}

fn config(name: &str) -> Value {
    json!({
        "sourcedefinition_id": SOURCE_DEFINITION_ID,
        "workspace_id": WORKSPACE_ID,
        "name": name,
        "connection_configuration": connection()
    })
}

#[tokio::test]
async fn test_source_crud() {
    let server = MockServer::start().await;
    post("sources/create")
        .and(body_json(json!({
            "sourceDefinitionId": SOURCE_DEFINITION_ID,
            "workspaceId": WORKSPACE_ID,
            "name": "analytics-db",
            "connectionConfiguration": connection()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(source("analytics-db", connection())))
        .expect(1)
        .mount(&server)
        .await;
    let before_update = post("sources/get")
        .and(body_json(json!({"sourceId": SOURCE_ID})))
        .respond_with(ResponseTemplate::new(200).set_body_json(source("analytics-db", connection())))
        .mount_as_scoped(&server)
        .await;

    let tester = tester(&server).await;
    let plan = assert_ok!(tester.plan_create("airbyte_source", config("analytics-db")).await);
    assert_plan_creates(&plan);

    let created = assert_ok!(tester.lifecycle_create("airbyte_source", config("analytics-db")).await);
    assert_eq!(created["id"], SOURCE_ID);
    assert_eq!(created["source_name"], "custom-source");
    assert_eq!(created["connection_configuration"], connection());

    let replan = assert_ok!(
        tester
            .plan_update("airbyte_source", created.clone(), config("analytics-db"))
            .await
    );
    assert_plan_no_changes(&replan);

    drop(before_update);
    post("sources/update")
        .respond_with(ResponseTemplate::new(200).set_body_json(source("analytics-db-v2", connection())))
        .expect(1)
        .mount(&server)
        .await;
    post("sources/get")
        .respond_with(ResponseTemplate::new(200).set_body_json(source("analytics-db-v2", connection())))
        .mount(&server)
        .await;
    post("sources/delete")
        .and(body_json(json!({"sourceId": SOURCE_ID})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let updated = assert_ok!(
        tester
            .lifecycle_update("airbyte_source", created, config("analytics-db-v2"))
            .await
    );
    assert_eq!(updated["name"], "analytics-db-v2");

    let sent = bodies(&server, "sources/update").await;
    assert_eq!(
        sent[0],
        json!({"sourceId": SOURCE_ID, "name": "analytics-db-v2", "connectionConfiguration": connection()})
    );

    assert_ok!(tester.lifecycle_delete("airbyte_source", updated).await);
}

#[tokio::test]
async fn test_moving_workspace_replaces() {
    let server = MockServer::start().await;
    let tester = tester(&server).await;

    let mut prior = config("analytics-db");
    prior["id"] = json!(SOURCE_ID);
    let mut proposed = config("analytics-db");
    proposed["workspace_id"] = json!("9e8d7c6b-5a49-4838-a7b6-c5d4e3f2a1b0");

    let plan = assert_ok!(tester.plan_update("airbyte_source", prior, proposed).await);
    assert_plan_replaces(&plan);
}

#[tokio::test]
async fn test_missing_configuration_fails_before_any_request() {
    let server = MockServer::start().await;
    let tester = tester(&server).await;

    let err = assert_err!(
        tester
            .create(
                "airbyte_source",
                json!({"sourcedefinition_id": SOURCE_DEFINITION_ID, "workspace_id": WORKSPACE_ID, "name": "x"}),
            )
            .await
    );
    assert!(matches!(err, ProviderError::Validation(_)));
    assert!(err.to_string().contains("connection_configuration"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_import_unknown_id() {
    let server = MockServer::start().await;
    post("sources/get")
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Could not find source"})))
        .mount(&server)
        .await;

    let tester = tester(&server).await;
    let err = assert_err!(tester.import_resource("airbyte_source", "does-not-exist").await);
    assert_eq!(err.status(), Some(404));
}
