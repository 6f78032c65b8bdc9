//! `airbyte_workspace` resource and data source.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use super::{require_id, WORKSPACE};
use crate::api::{
    CommonWorkspaceFields, Notification, SlackConfiguration, Workspace, WorkspaceCreate,
    WorkspaceUpdate,
};
use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::optional::Optional;
use crate::schema::{Attribute, Block, NestedBlock, Schema};

const NOTIFICATION_TYPES: [&str; 1] = ["slack"];
const GEOGRAPHY_DESCRIPTION: &str = "Possible values: auto | us | eu";
const SLACK_WEBHOOK_DESCRIPTION: &str = "Configuration for Slack notifications - See \
     https://slack.com/help/articles/115005265063-Incoming-webhooks-for-Slack";

/// Workspace state as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceState {
    /// Server-assigned workspace id.
    pub id: Optional<String>,
    /// Server-assigned customer id.
    pub customer_id: Optional<String>,
    /// Contact email.
    pub email: Optional<String>,
    /// Workspace name.
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    /// URL-safe unique name.
    pub slug: Optional<String>,
    /// Whether initial setup has finished.
    pub initial_setup_complete: Optional<bool>,
    /// Show the setup wizard in the UI.
    pub display_setup_wizard: Optional<bool>,
    /// Anonymous usage data collection.
    pub anonymous_data_collection: Optional<bool>,
    /// Show news updates in the UI.
    pub news: Optional<bool>,
    /// Show security updates in the UI.
    pub security_updates: Optional<bool>,
    /// Notification channels, in order.
    pub notification_config: Optional<Vec<NotificationConfig>>,
    /// Whether a first sync has completed. The published attribute name is
    /// `fist_completed_sync`; state written under it must keep decoding.
    #[serde(rename = "fist_completed_sync")]
    pub first_completed_sync: Optional<bool>,
    /// Whether feedback was given.
    pub feedback_done: Optional<bool>,
    /// Default data residency: `auto`, `us` or `eu`.
    pub default_geography: Optional<String>,
}

/// One `notification_config` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Channel type; only `slack`.
    #[serde(deserialize_with = "super::null_as_default")]
    pub notification_type: String,
    /// Notify on successful syncs.
    pub send_on_success: Optional<bool>,
    /// Notify on failed syncs.
    pub send_on_failure: Optional<bool>,
    /// Incoming webhook URL.
    #[serde(deserialize_with = "super::null_as_default")]
    pub slack_webhook: String,
}

impl NotificationConfig {
    fn to_wire(&self) -> Notification {
        Notification {
            notification_type: self.notification_type.clone(),
            send_on_success: self.send_on_success.unwrap_or(false),
            send_on_failure: self.send_on_failure.unwrap_or(true),
            slack_configuration: SlackConfiguration {
                webhook: self.slack_webhook.clone(),
            },
        }
    }

    fn from_wire(notification: Notification) -> Self {
        Self {
            notification_type: notification.notification_type,
            send_on_success: Optional::Present(notification.send_on_success),
            send_on_failure: Optional::Present(notification.send_on_failure),
            slack_webhook: notification.slack_configuration.webhook,
        }
    }
}

impl WorkspaceState {
    fn common_fields(&self) -> CommonWorkspaceFields {
        CommonWorkspaceFields {
            email: self.email.clone(),
            anonymous_data_collection: self.anonymous_data_collection,
            news: self.news,
            security_updates: self.security_updates,
            display_setup_wizard: self.display_setup_wizard,
            notifications: self
                .notification_config
                .as_ref()
                .map(|configs| configs.iter().map(NotificationConfig::to_wire).collect()),
        }
    }

    /// Body for `workspaces/create`.
    pub fn to_create(&self) -> WorkspaceCreate {
        WorkspaceCreate {
            name: self.name.clone(),
            fields: self.common_fields(),
        }
    }

    /// Body for `workspaces/update`.
    pub fn to_update(&self) -> Result<WorkspaceUpdate, ProviderError> {
        Ok(WorkspaceUpdate {
            workspace_id: require_id(WORKSPACE, &self.id)?.to_string(),
            fields: self.common_fields(),
        })
    }

    /// State reported by the server.
    pub fn from_wire(workspace: Workspace) -> Self {
        Self {
            id: Optional::Present(workspace.workspace_id),
            customer_id: workspace.customer_id,
            email: workspace.email,
            name: workspace.name,
            slug: workspace.slug,
            initial_setup_complete: workspace.initial_setup_complete,
            display_setup_wizard: workspace.display_setup_wizard,
            anonymous_data_collection: workspace.anonymous_data_collection,
            news: workspace.news,
            security_updates: workspace.security_updates,
            notification_config: Optional::Present(
                workspace
                    .notifications
                    .unwrap_or_default()
                    .into_iter()
                    .map(NotificationConfig::from_wire)
                    .collect(),
            ),
            first_completed_sync: workspace.first_completed_sync,
            feedback_done: workspace.feedback_done,
            default_geography: workspace.default_geography,
        }
    }
}

/// How a workspace data source identifies its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceLookup {
    /// Lookup by id.
    Id(String),
    /// Lookup by slug.
    Slug(String),
}

impl WorkspaceLookup {
    /// Exactly one of `id` and `slug` must be set.
    pub fn from_state(state: &WorkspaceState) -> Result<Self, ProviderError> {
        let id = state.id.as_present().filter(|v| !v.is_empty());
        let slug = state.slug.as_present().filter(|v| !v.is_empty());
        match (id, slug) {
            (Some(_), Some(_)) => Err(ProviderError::Validation(
                "Only one of `id` and `slug` can be set".to_string(),
            )),
            (Some(id), None) => Ok(Self::Id(id.clone())),
            (None, Some(slug)) => Ok(Self::Slug(slug.clone())),
            (None, None) => Err(ProviderError::Validation(
                "One of `id` or `slug` must be set".to_string(),
            )),
        }
    }
}

/// Resource schema.
pub fn schema() -> Schema {
    Schema::v0()
        .with_description("Airbyte Workspace")
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("Workspace ID"),
        )
        .with_attribute(
            "customer_id",
            Attribute::computed_string().with_description("Customer ID"),
        )
        .with_attribute(
            "email",
            Attribute::optional_computed_string().with_description("Customer Email"),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("Workspace Name")
                .with_force_new(),
        )
        .with_attribute(
            "slug",
            Attribute::computed_string().with_description("Workspace Slug"),
        )
        .with_attribute(
            "initial_setup_complete",
            Attribute::computed_bool().with_description("Is the initial setup complete"),
        )
        .with_attribute(
            "display_setup_wizard",
            Attribute::optional_computed_bool()
                .with_description("Should the UI display the setup wizard"),
        )
        .with_attribute(
            "anonymous_data_collection",
            Attribute::optional_computed_bool()
                .with_description("Is anonymous data collection turned on"),
        )
        .with_attribute(
            "news",
            Attribute::optional_computed_bool().with_description("Should the UI show news updates"),
        )
        .with_attribute(
            "security_updates",
            Attribute::optional_computed_bool()
                .with_description("Should the UI show security updates"),
        )
        .with_block(
            "notification_config",
            NestedBlock::list(notification_block()).with_computed(),
        )
        .with_attribute(
            "fist_completed_sync",
            Attribute::computed_bool().with_description("Has a first sync completed"),
        )
        .with_attribute("feedback_done", Attribute::computed_bool())
        .with_attribute(
            "default_geography",
            Attribute::computed_string().with_description(GEOGRAPHY_DESCRIPTION),
        )
}

fn notification_block() -> Block {
    Block::new()
        .with_description("Notification systems set up")
        .with_attribute(
            "notification_type",
            Attribute::required_string()
                .with_description("Possible value: slack")
                .with_allowed_values(NOTIFICATION_TYPES),
        )
        .with_attribute(
            "send_on_success",
            Attribute::optional_bool()
                .with_description("Should the notification be sent for successes")
                .with_default(json!(false)),
        )
        .with_attribute(
            "send_on_failure",
            Attribute::optional_bool()
                .with_description("Should the notification be sent for failures")
                .with_default(json!(true)),
        )
        .with_attribute(
            "slack_webhook",
            Attribute::required_string().with_description(SLACK_WEBHOOK_DESCRIPTION),
        )
}

/// Data source schema: look a workspace up by id or slug.
pub fn data_source_schema() -> Schema {
    let computed_notifications = Block::new()
        .with_description("Notification systems set up")
        .with_attribute(
            "notification_type",
            Attribute::computed_string().with_description("Possible value: slack"),
        )
        .with_attribute(
            "send_on_success",
            Attribute::computed_bool()
                .with_description("Should the notification be sent for successes"),
        )
        .with_attribute(
            "send_on_failure",
            Attribute::computed_bool()
                .with_description("Should the notification be sent for failures"),
        )
        .with_attribute(
            "slack_webhook",
            Attribute::computed_string().with_description(SLACK_WEBHOOK_DESCRIPTION),
        );

    Schema::v0()
        .with_description("Get an Airbyte Workspace by id or slug")
        .with_attribute(
            "id",
            Attribute::optional_computed_string().with_description("Workspace ID"),
        )
        .with_attribute(
            "slug",
            Attribute::optional_computed_string().with_description("Workspace Slug"),
        )
        .with_attribute(
            "customer_id",
            Attribute::computed_string().with_description("Customer ID"),
        )
        .with_attribute(
            "email",
            Attribute::computed_string().with_description("Customer Email"),
        )
        .with_attribute(
            "name",
            Attribute::computed_string().with_description("Workspace Name"),
        )
        .with_attribute(
            "initial_setup_complete",
            Attribute::computed_bool().with_description("Is the initial setup complete"),
        )
        .with_attribute(
            "display_setup_wizard",
            Attribute::computed_bool().with_description("Should the UI display the setup wizard"),
        )
        .with_attribute(
            "anonymous_data_collection",
            Attribute::computed_bool().with_description("Is anonymous data collection turned on"),
        )
        .with_attribute(
            "news",
            Attribute::computed_bool().with_description("Should the UI show news updates"),
        )
        .with_attribute(
            "security_updates",
            Attribute::computed_bool().with_description("Should the UI show security updates"),
        )
        .with_block(
            "notification_config",
            NestedBlock::list(computed_notifications).with_computed(),
        )
        .with_attribute(
            "fist_completed_sync",
            Attribute::computed_bool().with_description("Has a first sync completed"),
        )
        .with_attribute("feedback_done", Attribute::computed_bool())
        .with_attribute(
            "default_geography",
            Attribute::computed_string().with_description(GEOGRAPHY_DESCRIPTION),
        )
}

/// Create the resource, then read it back.
#[instrument(skip_all, fields(name = %state.name))]
pub async fn create(client: &ApiClient, state: &WorkspaceState) -> Result<WorkspaceState, ProviderError> {
    let created = client.create_workspace(&state.to_create()).await?;
    info!(workspace_id = %created.workspace_id, "workspace created");
    read_by_id(client, &created.workspace_id).await
}

/// Refresh state from the server.
#[instrument(skip_all)]
pub async fn read(client: &ApiClient, state: &WorkspaceState) -> Result<WorkspaceState, ProviderError> {
    read_by_id(client, require_id(WORKSPACE, &state.id)?).await
}

/// Read by server-assigned id, as import does.
#[instrument(skip(client))]
pub async fn read_by_id(client: &ApiClient, workspace_id: &str) -> Result<WorkspaceState, ProviderError> {
    let workspace = client.get_workspace_by_id(workspace_id).await?;
    Ok(WorkspaceState::from_wire(workspace))
}

/// Apply the mutable fields, then read back.
#[instrument(skip_all, fields(id = ?state.id))]
pub async fn update(client: &ApiClient, state: &WorkspaceState) -> Result<WorkspaceState, ProviderError> {
    let updated = client.update_workspace(&state.to_update()?).await?;
    info!(workspace_id = %updated.workspace_id, "workspace updated");
    read_by_id(client, &updated.workspace_id).await
}

/// Delete by id.
#[instrument(skip_all, fields(id = ?state.id))]
pub async fn delete(client: &ApiClient, state: &WorkspaceState) -> Result<(), ProviderError> {
    let workspace_id = require_id(WORKSPACE, &state.id)?;
    client.delete_workspace(workspace_id).await?;
    info!(workspace_id, "workspace deleted");
    Ok(())
}

/// Data source read.
#[instrument(skip_all)]
pub async fn lookup(client: &ApiClient, query: &WorkspaceState) -> Result<WorkspaceState, ProviderError> {
    let workspace = match WorkspaceLookup::from_state(query)? {
        WorkspaceLookup::Id(id) => client.get_workspace_by_id(&id).await?,
        WorkspaceLookup::Slug(slug) => client.get_workspace_by_slug(&slug).await?,
    };
    Ok(WorkspaceState::from_wire(workspace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::decode_state;
    use crate::validation::validate;
    use serde_json::json;

    fn wire_workspace() -> Workspace {
        serde_json::from_value(json!({
            "workspaceId": "b5a5f1d6-8f0e-4a43-9f4b-6b7f0c1e2d3a",
            "customerId": "c1",
            "name": "complex_test",
            "slug": "complex_test-1",
            "initialSetupComplete": false,
            "news": false,
            "notifications": [{
                "notificationType": "slack",
                "sendOnSuccess": true,
                "sendOnFailure": false,
                "slackConfiguration": {"webhook": "http://example.com/webhook"}
            }],
            "defaultGeography": "auto"
        }))
        .unwrap()
    }

    #[test]
    fn test_outbound_presence_not_truthiness() {
        let state: WorkspaceState = decode_state(
            WORKSPACE,
            json!({"name": "complex_test", "anonymous_data_collection": false, "news": null}),
        )
        .unwrap();

        let body = serde_json::to_value(state.to_create()).unwrap();
        assert_eq!(
            body,
            json!({"name": "complex_test", "anonymousDataCollection": false})
        );
    }

    #[test]
    fn test_notification_defaults_applied_outbound() {
        let state: WorkspaceState = decode_state(
            WORKSPACE,
            json!({
                "name": "complex_test",
                "notification_config": [
                    {"notification_type": "slack", "send_on_success": true, "slack_webhook": "http://example.com/webhook"},
                    {"notification_type": "slack", "send_on_failure": false, "slack_webhook": "https://example2.com/cooler-webhook"}
                ]
            }),
        )
        .unwrap();

        let body = serde_json::to_value(state.to_create()).unwrap();
        assert_eq!(
            body["notifications"],
            json!([
                {"notificationType": "slack", "sendOnSuccess": true, "sendOnFailure": true,
                 "slackConfiguration": {"webhook": "http://example.com/webhook"}},
                {"notificationType": "slack", "sendOnSuccess": false, "sendOnFailure": false,
                 "slackConfiguration": {"webhook": "https://example2.com/cooler-webhook"}}
            ])
        );
    }

    #[test]
    fn test_update_requires_id() {
        let state = WorkspaceState {
            name: "basic_test".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            state.to_update(),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_inbound_preserves_unset() {
        let state = WorkspaceState::from_wire(wire_workspace());

        assert_eq!(state.news, Optional::Present(false));
        assert!(state.email.is_unset());
        assert!(state.security_updates.is_unset());
        assert!(state.first_completed_sync.is_unset());
        assert_eq!(state.default_geography, Optional::Present("auto".to_string()));

        let notifications = state.notification_config.as_present().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].send_on_failure, Optional::Present(false));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["email"], json!(null));
        assert_eq!(value["fist_completed_sync"], json!(null));
        assert_eq!(value["notification_config"][0]["slack_webhook"], "http://example.com/webhook");
    }

    #[test]
    fn test_missing_notifications_read_as_empty_list() {
        let mut workspace = wire_workspace();
        workspace.notifications = Optional::Unset;
        let state = WorkspaceState::from_wire(workspace);
        assert_eq!(state.notification_config, Optional::Present(vec![]));
    }

    #[test]
    fn test_lookup_requires_exactly_one_key() {
        let both = WorkspaceState {
            id: Optional::Present("ws-1".to_string()),
            slug: Optional::Present("basic".to_string()),
            ..Default::default()
        };
        let err = WorkspaceLookup::from_state(&both).unwrap_err();
        assert!(err.to_string().contains("Only one of `id` and `slug`"));

        assert!(WorkspaceLookup::from_state(&WorkspaceState::default()).is_err());

        let by_slug = WorkspaceState {
            slug: Optional::Present("basic".to_string()),
            ..Default::default()
        };
        assert_eq!(
            WorkspaceLookup::from_state(&by_slug).unwrap(),
            WorkspaceLookup::Slug("basic".to_string())
        );
    }

    #[test]
    fn test_schema_rejects_unknown_notification_type() {
        let diagnostics = validate(
            &schema(),
            &json!({
                "name": "complex_test",
                "notification_config": [{"notification_type": "email", "slack_webhook": "x"}]
            }),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute.as_deref(),
            Some("notification_config.0.notification_type")
        );
    }

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        assert!(schema.block.attributes["name"].force_new);
        assert!(schema.block.attributes["slug"].flags.is_read_only());
        assert!(schema.block.attributes.contains_key("fist_completed_sync"));
        assert!(schema.block.blocks["notification_config"].computed);

        let data_source = data_source_schema();
        assert!(data_source.block.attributes["id"].flags.optional);
        assert!(data_source.block.attributes["slug"].flags.optional);
        assert!(data_source.block.attributes["name"].flags.is_read_only());
    }
}
