//! Workspace endpoints.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::optional::Optional;

/// Fields shared by the create and update bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonWorkspaceFields {
    /// Contact email.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub email: Optional<String>,
    /// Anonymous usage data collection.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub anonymous_data_collection: Optional<bool>,
    /// Show news updates in the UI.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub news: Optional<bool>,
    /// Show security updates in the UI.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub security_updates: Optional<bool>,
    /// Show the setup wizard in the UI.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub display_setup_wizard: Optional<bool>,
    /// Notification channels, in order.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub notifications: Optional<Vec<Notification>>,
}

/// Body of `workspaces/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceCreate {
    /// Workspace name.
    pub name: String,
    /// Settable workspace fields.
    #[serde(flatten)]
    pub fields: CommonWorkspaceFields,
}

/// Body of `workspaces/update`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUpdate {
    /// Workspace to update.
    pub workspace_id: String,
    /// Settable workspace fields.
    #[serde(flatten)]
    pub fields: CommonWorkspaceFields,
}

/// Body of the workspace get and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceIdBody {
    /// Workspace id.
    pub workspace_id: String,
}

/// Body of `workspaces/get_by_slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugBody {
    /// Workspace slug.
    pub slug: String,
}

/// A notification channel attached to a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Channel type; only `slack`.
    pub notification_type: String,
    /// Notify on successful syncs.
    #[serde(default)]
    pub send_on_success: bool,
    /// Notify on failed syncs.
    #[serde(default)]
    pub send_on_failure: bool,
    /// Slack delivery settings.
    #[serde(default)]
    pub slack_configuration: SlackConfiguration,
}

/// Slack delivery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackConfiguration {
    /// Incoming webhook URL.
    #[serde(default)]
    pub webhook: String,
}

/// Workspace as returned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Server-assigned id.
    pub workspace_id: String,
    /// Server-assigned customer id.
    #[serde(default)]
    pub customer_id: Optional<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Optional<String>,
    /// Workspace name.
    pub name: String,
    /// URL-safe unique name.
    #[serde(default)]
    pub slug: Optional<String>,
    /// Whether initial setup has finished.
    #[serde(default)]
    pub initial_setup_complete: Optional<bool>,
    /// Show the setup wizard in the UI.
    #[serde(default)]
    pub display_setup_wizard: Optional<bool>,
    /// Anonymous usage data collection.
    #[serde(default)]
    pub anonymous_data_collection: Optional<bool>,
    /// Show news updates in the UI.
    #[serde(default)]
    pub news: Optional<bool>,
    /// Show security updates in the UI.
    #[serde(default)]
    pub security_updates: Optional<bool>,
    /// Notification channels, in order.
    #[serde(default)]
    pub notifications: Optional<Vec<Notification>>,
    /// Whether a first sync has completed.
    #[serde(default)]
    pub first_completed_sync: Optional<bool>,
    /// Whether feedback was given.
    #[serde(default)]
    pub feedback_done: Optional<bool>,
    /// Default data residency: `auto`, `us` or `eu`.
    #[serde(default)]
    pub default_geography: Optional<String>,
}

impl ApiClient {
    /// `workspaces/create`.
    pub async fn create_workspace(&self, body: &WorkspaceCreate) -> Result<Workspace, ProviderError> {
        self.post("workspaces/create", body).await
    }

    /// `workspaces/get`.
    pub async fn get_workspace_by_id(&self, workspace_id: &str) -> Result<Workspace, ProviderError> {
        let body = WorkspaceIdBody {
            workspace_id: workspace_id.to_string(),
        };
        self.post("workspaces/get", &body).await
    }

    /// `workspaces/get_by_slug`.
    pub async fn get_workspace_by_slug(&self, slug: &str) -> Result<Workspace, ProviderError> {
        let body = SlugBody {
            slug: slug.to_string(),
        };
        self.post("workspaces/get_by_slug", &body).await
    }

    /// `workspaces/update`.
    pub async fn update_workspace(&self, body: &WorkspaceUpdate) -> Result<Workspace, ProviderError> {
        self.post("workspaces/update", body).await
    }

    /// `workspaces/delete`.
    pub async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ProviderError> {
        let body = WorkspaceIdBody {
            workspace_id: workspace_id.to_string(),
        };
        self.post_no_content("workspaces/delete", &body).await
    }
}
