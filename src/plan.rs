//! Schema-driven planning.
//!
//! A plan compares the prior state with the host's proposal attribute by
//! attribute. Values the server computes are carried forward from the prior
//! state when the proposal leaves them null, so a plan never reports a diff
//! for a field the user did not touch.

use serde_json::{Map, Value};

use crate::schema::Schema;
use crate::types::{AttributeChange, PlanResult};

/// Plan a create, update or destroy.
///
/// - `prior` is `None` for a create.
/// - A `null` proposal is a destroy.
pub fn plan(schema: &Schema, prior: Option<&Value>, proposed: Value) -> PlanResult {
    match (prior, proposed) {
        (Some(prior), Value::Null) => plan_destroy(prior),
        (None, proposed) => plan_create(proposed),
        (Some(prior), proposed) => plan_update(schema, prior, proposed),
    }
}

fn plan_create(proposed: Value) -> PlanResult {
    let changes = present_entries(&proposed)
        .map(|(name, value)| AttributeChange::added(name.as_str(), value.clone()))
        .collect();
    PlanResult::with_changes(proposed, changes, false)
}

fn plan_destroy(prior: &Value) -> PlanResult {
    let changes = present_entries(prior)
        .map(|(name, value)| AttributeChange::removed(name.as_str(), value.clone()))
        .collect();
    PlanResult::with_changes(Value::Null, changes, false)
}

fn plan_update(schema: &Schema, prior: &Value, proposed: Value) -> PlanResult {
    let empty = Map::new();
    let prior_obj = prior.as_object().unwrap_or(&empty);
    let mut planned = match proposed {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut changes = Vec::new();
    let mut requires_replace = false;

    for (name, attr) in &schema.block.attributes {
        let prior_value = prior_obj.get(name).unwrap_or(&Value::Null);
        let keep_prior = attr.flags.is_read_only()
            || (attr.flags.computed && planned.get(name).map_or(true, Value::is_null));
        if keep_prior {
            planned.insert(name.clone(), prior_value.clone());
            continue;
        }

        let planned_value = planned.get(name).unwrap_or(&Value::Null);
        if let Some(change) = diff(name, prior_value, planned_value) {
            requires_replace |= attr.force_new;
            changes.push(change);
        }
    }

    for (name, nested) in &schema.block.blocks {
        let prior_value = prior_obj.get(name).unwrap_or(&Value::Null);
        if nested.computed && planned.get(name).map_or(true, Value::is_null) {
            planned.insert(name.clone(), prior_value.clone());
            continue;
        }

        let planned_value = planned.get(name).unwrap_or(&Value::Null);
        if let Some(change) = diff(name, prior_value, planned_value) {
            changes.push(change);
        }
    }

    PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
}

fn diff(name: &str, before: &Value, after: &Value) -> Option<AttributeChange> {
    if without_nulls(before) == without_nulls(after) {
        return None;
    }
    match (before, after) {
        (Value::Null, after) => Some(AttributeChange::added(name, after.clone())),
        (before, Value::Null) => Some(AttributeChange::removed(name, before.clone())),
        (before, after) => Some(AttributeChange::modified(name, before.clone(), after.clone())),
    }
}

/// Object entries set to `null` are the same as absent ones.
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(without_nulls).collect()),
        other => other.clone(),
    }
}

fn present_entries(value: &Value) -> impl Iterator<Item = (&String, &Value)> {
    value
        .as_object()
        .into_iter()
        .flat_map(|map| map.iter())
        .filter(|(_, v)| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Block, NestedBlock};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("name", Attribute::required_string().with_force_new())
            .with_attribute("docker_image_tag", Attribute::required_string())
            .with_attribute("icon", Attribute::optional_computed_string())
            .with_attribute("email", Attribute::optional_string())
            .with_block(
                "notification_config",
                NestedBlock::list(Block::new().with_attribute("slack_webhook", Attribute::required_string()))
                    .with_computed(),
            )
    }

    #[test]
    fn test_create_reports_added_attributes() {
        let proposed = json!({"id": null, "name": "custom", "docker_image_tag": "0.1.0"});
        let result = plan(&schema(), None, proposed.clone());

        assert_eq!(result.planned_state, proposed);
        assert!(!result.requires_replace);
        assert_eq!(
            result.changes,
            vec![
                AttributeChange::added("docker_image_tag", json!("0.1.0")),
                AttributeChange::added("name", json!("custom")),
            ]
        );
    }

    #[test]
    fn test_update_in_place() {
        let prior = json!({
            "id": "sd-1",
            "name": "custom",
            "docker_image_tag": "0.1.0",
            "icon": "https://example.com/icon.svg",
            "notification_config": []
        });
        let proposed = json!({"id": null, "name": "custom", "docker_image_tag": "0.2.0", "icon": null});

        let result = plan(&schema(), Some(&prior), proposed);

        assert!(!result.requires_replace);
        assert_eq!(
            result.changes,
            vec![AttributeChange::modified("docker_image_tag", json!("0.1.0"), json!("0.2.0"))]
        );
        assert_eq!(result.planned_state["id"], "sd-1");
        assert_eq!(result.planned_state["icon"], "https://example.com/icon.svg");
        assert_eq!(result.planned_state["notification_config"], json!([]));
    }

    #[test]
    fn test_force_new_requires_replace() {
        let prior = json!({"id": "sd-1", "name": "custom", "docker_image_tag": "0.1.0"});
        let proposed = json!({"name": "renamed", "docker_image_tag": "0.1.0"});

        let result = plan(&schema(), Some(&prior), proposed);
        assert!(result.requires_replace);
        assert_eq!(result.changes.len(), 1);
    }

    #[test]
    fn test_optional_attribute_cleared() {
        let prior = json!({"id": "ws-1", "name": "basic", "docker_image_tag": "x", "email": "a@example.com"});
        let proposed = json!({"name": "basic", "docker_image_tag": "x", "email": null});

        let result = plan(&schema(), Some(&prior), proposed);
        assert_eq!(
            result.changes,
            vec![AttributeChange::removed("email", json!("a@example.com"))]
        );
    }

    #[test]
    fn test_null_block_fields_match_absent_ones() {
        let prior = json!({
            "id": "ws-1",
            "name": "basic",
            "docker_image_tag": "x",
            "notification_config": [{"slack_webhook": "http://example.com/webhook", "send_on_success": null}]
        });
        let proposed = json!({
            "name": "basic",
            "docker_image_tag": "x",
            "notification_config": [{"slack_webhook": "http://example.com/webhook"}]
        });

        let result = plan(&schema(), Some(&prior), proposed);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_destroy() {
        let prior = json!({"id": "ws-1", "name": "basic", "email": null});
        let result = plan(&schema(), Some(&prior), Value::Null);

        assert_eq!(result.planned_state, Value::Null);
        assert_eq!(result.changes.len(), 2);
        assert!(result.changes.iter().all(|c| c.after.is_none()));
    }
}
