//! Property-based tests using proptest
//!
//! These tests check that presence survives translation: every field the
//! configuration sets reaches the wire (even when false or empty), and no
//! field it leaves out does. They also check that user-assigned fields come
//! back unchanged after a trip through the server's response shape.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use airbyte_provider::api::{Source, SourceDefinition};
use airbyte_provider::resources::source::SourceState;
use airbyte_provider::resources::source_definition::SourceDefinitionState;
use airbyte_provider::resources::workspace::WorkspaceState;
use airbyte_provider::resources::{decode_state, SOURCE, SOURCE_DEFINITION, WORKSPACE};

/// Optional workspace flags: (state attribute, wire key).
const WORKSPACE_FLAGS: [(&str, &str); 4] = [
    ("anonymous_data_collection", "anonymousDataCollection"),
    ("news", "news"),
    ("security_updates", "securityUpdates"),
    ("display_setup_wizard", "displaySetupWizard"),
];

const QUADRUPLE: [&str; 4] = ["cpu_request", "cpu_limit", "memory_request", "memory_limit"];

/// Each flag is either absent, explicitly null, or a concrete bool.
fn arb_flag() -> impl Strategy<Value = Option<Option<bool>>> {
    prop_oneof![
        Just(None),
        Just(Some(None)),
        any::<bool>().prop_map(|b| Some(Some(b))),
    ]
}

fn arb_email() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![Just(String::new()), "[a-z]{1,8}@example\\.com"])
}

fn arb_quantity() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![Just(String::new()), "[1-9][0-9]{0,2}(m|Mi|Gi)?"])
}

/// Arbitrary nested JSON. Floats are left out so values compare exactly
/// after a trip through JSON text.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _./:@-]{0,16}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn arb_configuration() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z_]{1,12}", arb_json(), 1..6)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Re-encode a request body as the server would echo it, with `id_key` assigned.
fn echo<T: serde::de::DeserializeOwned>(body: Value, id_key: &str, id: &str) -> T {
    let mut echoed = body;
    echoed[id_key] = json!(id);
    let text = serde_json::to_vec(&echoed).unwrap();
    serde_json::from_slice(&text).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn workspace_body_keys_match_present_fields(
        flags in prop::collection::vec(arb_flag(), 4),
        email in arb_email(),
    ) {
        let mut config = Map::new();
        config.insert("name".to_string(), json!("presence_test"));
        let mut expected = BTreeSet::from(["name".to_string()]);

        for ((attr, wire), flag) in WORKSPACE_FLAGS.iter().zip(&flags) {
            match flag {
                None => {},
                Some(None) => {
                    config.insert(attr.to_string(), Value::Null);
                },
                Some(Some(b)) => {
                    config.insert(attr.to_string(), json!(b));
                    expected.insert(wire.to_string());
                },
            }
        }
        if let Some(email) = &email {
            config.insert("email".to_string(), json!(email));
            expected.insert("email".to_string());
        }

        let state: WorkspaceState = decode_state(WORKSPACE, Value::Object(config)).unwrap();
        let body = serde_json::to_value(state.to_create()).unwrap();
        let keys: BTreeSet<String> = body.as_object().unwrap().keys().cloned().collect();
        prop_assert_eq!(keys, expected);

        for ((_, wire), flag) in WORKSPACE_FLAGS.iter().zip(&flags) {
            if let Some(Some(b)) = flag {
                prop_assert_eq!(&body[*wire], &json!(b));
            }
        }
    }

    #[test]
    fn default_requirements_keep_exactly_the_set_quantities(
        values in prop::collection::vec(arb_quantity(), 4),
    ) {
        let mut block = Map::new();
        for (key, value) in QUADRUPLE.iter().zip(&values) {
            if let Some(value) = value {
                block.insert(key.to_string(), json!(value));
            }
        }

        let state: SourceDefinitionState = decode_state(
            SOURCE_DEFINITION,
            json!({
                "name": "custom-source",
                "docker_repository": "airbyte/source-custom",
                "docker_image_tag": "0.1.0",
                "documentation_url": "https://docs.example.com",
                "default_resource_requirements": [Value::Object(block.clone())]
            }),
        )
        .unwrap();

        let body = serde_json::to_value(state.to_create().unwrap()).unwrap();
        prop_assert_eq!(&body["resourceRequirements"]["default"], &Value::Object(block));
        prop_assert!(body["resourceRequirements"].get("jobSpecific").is_none());
    }

    #[test]
    fn notification_defaults_only_fill_missing_flags(
        success in prop::option::of(any::<bool>()),
        failure in prop::option::of(any::<bool>()),
    ) {
        let mut notification = json!({
            "notification_type": "slack",
            "slack_webhook": "http://example.com/webhook"
        });
        if let Some(success) = success {
            notification["send_on_success"] = json!(success);
        }
        if let Some(failure) = failure {
            notification["send_on_failure"] = json!(failure);
        }

        let state: WorkspaceState = decode_state(
            WORKSPACE,
            json!({"name": "complex_test", "notification_config": [notification]}),
        )
        .unwrap();
        let body = serde_json::to_value(state.to_create()).unwrap();

        prop_assert_eq!(&body["notifications"][0]["sendOnSuccess"], &json!(success.unwrap_or(false)));
        prop_assert_eq!(&body["notifications"][0]["sendOnFailure"], &json!(failure.unwrap_or(true)));
    }

    #[test]
    fn source_round_trip_keeps_name_and_configuration(
        name in "\\PC{1,24}",
        configuration in arb_configuration(),
    ) {
        let state: SourceState = decode_state(
            SOURCE,
            json!({
                "sourcedefinition_id": "sd-1",
                "workspace_id": "ws-1",
                "name": name,
                "connection_configuration": configuration
            }),
        )
        .unwrap();

        let wire: Source = echo(serde_json::to_value(state.to_create()).unwrap(), "sourceId", "src-1");
        let read_back = SourceState::from_wire(wire);

        prop_assert_eq!(&read_back.name, &state.name);
        prop_assert_eq!(&read_back.connection_configuration, &state.connection_configuration);
        prop_assert_eq!(&read_back.sourcedefinition_id, "sd-1");
        prop_assert_eq!(&read_back.workspace_id, "ws-1");
    }

    #[test]
    fn source_definition_round_trip_keeps_name_and_tag(
        name in "\\PC{1,24}",
        docker_image_tag in "[a-z0-9][a-z0-9._-]{0,15}",
    ) {
        let state: SourceDefinitionState = decode_state(
            SOURCE_DEFINITION,
            json!({
                "name": name,
                "docker_repository": "airbyte/source-custom",
                "docker_image_tag": docker_image_tag,
                "documentation_url": "https://docs.example.com"
            }),
        )
        .unwrap();

        let wire: SourceDefinition = echo(
            serde_json::to_value(state.to_create().unwrap()).unwrap(),
            "sourceDefinitionId",
            "sd-1",
        );
        let read_back = SourceDefinitionState::from_wire(wire);

        prop_assert_eq!(&read_back.name, &state.name);
        prop_assert_eq!(&read_back.docker_image_tag, &state.docker_image_tag);
        prop_assert_eq!(&read_back.docker_repository, &state.docker_repository);
        prop_assert_eq!(&read_back.documentation_url, &state.documentation_url);
    }
}
