//! `airbyte_source` resource.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::{require_id, SOURCE};
use crate::api::{Source, SourceCreate, SourceUpdate};
use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::optional::Optional;
use crate::schema::{Attribute, Schema};

/// Source state as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceState {
    /// Server-assigned source id.
    pub id: Optional<String>,
    /// Source definition the source is built on.
    #[serde(deserialize_with = "super::null_as_default")]
    pub sourcedefinition_id: String,
    /// Workspace the source belongs to.
    #[serde(deserialize_with = "super::null_as_default")]
    pub workspace_id: String,
    /// Source name.
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    /// Name of the source definition.
    pub source_name: Optional<String>,
    /// Icon URL shown in the UI.
    pub icon: Optional<String>,
    /// Connector configuration, opaque to the provider.
    #[serde(deserialize_with = "super::null_as_default")]
    pub connection_configuration: Map<String, Value>,
}

impl SourceState {
    /// Body for `sources/create`.
    pub fn to_create(&self) -> SourceCreate {
        SourceCreate {
            source_definition_id: self.sourcedefinition_id.clone(),
            workspace_id: self.workspace_id.clone(),
            name: self.name.clone(),
            connection_configuration: self.connection_configuration.clone(),
        }
    }

    /// Body for `sources/update`.
    pub fn to_update(&self) -> Result<SourceUpdate, ProviderError> {
        Ok(SourceUpdate {
            source_id: require_id(SOURCE, &self.id)?.to_string(),
            name: self.name.clone(),
            connection_configuration: self.connection_configuration.clone(),
        })
    }

    /// State reported by the server.
    pub fn from_wire(source: Source) -> Self {
        Self {
            id: Optional::Present(source.source_id),
            sourcedefinition_id: source.source_definition_id,
            workspace_id: source.workspace_id,
            name: source.name,
            source_name: source.source_name,
            icon: source.icon,
            connection_configuration: source.connection_configuration,
        }
    }
}

/// Resource schema.
pub fn schema() -> Schema {
    Schema::v0()
        .with_description("Airbyte Source")
        .with_attribute("id", Attribute::computed_string().with_description("Source ID"))
        .with_attribute(
            "sourcedefinition_id",
            Attribute::required_string()
                .with_description("Source Definition ID")
                .with_force_new(),
        )
        .with_attribute(
            "workspace_id",
            Attribute::required_string()
                .with_description("Workspace ID")
                .with_force_new(),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("Name of the Source"),
        )
        .with_attribute(
            "source_name",
            Attribute::computed_string().with_description("Name of the Source Definition"),
        )
        .with_attribute(
            "icon",
            Attribute::computed_string().with_description("URL for the icon displayed in the UI"),
        )
        .with_attribute(
            "connection_configuration",
            Attribute::required_dynamic_map()
                .with_description("Map of Credentials for the source")
                .sensitive(),
        )
}

/// Create the resource, then read it back.
#[instrument(skip_all, fields(name = %state.name, workspace_id = %state.workspace_id))]
pub async fn create(client: &ApiClient, state: &SourceState) -> Result<SourceState, ProviderError> {
    let created = client.create_source(&state.to_create()).await?;
    info!(source_id = %created.source_id, "source created");
    read_by_id(client, &created.source_id).await
}

/// Refresh state from the server.
#[instrument(skip_all)]
pub async fn read(client: &ApiClient, state: &SourceState) -> Result<SourceState, ProviderError> {
    read_by_id(client, require_id(SOURCE, &state.id)?).await
}

/// Read by server-assigned id, as import does.
#[instrument(skip(client))]
pub async fn read_by_id(client: &ApiClient, source_id: &str) -> Result<SourceState, ProviderError> {
    let source = client.get_source(source_id).await?;
    Ok(SourceState::from_wire(source))
}

/// Apply the mutable fields, then read back.
#[instrument(skip_all, fields(id = ?state.id))]
pub async fn update(client: &ApiClient, state: &SourceState) -> Result<SourceState, ProviderError> {
    let updated = client.update_source(&state.to_update()?).await?;
    info!(source_id = %updated.source_id, "source updated");
    read_by_id(client, &updated.source_id).await
}

/// Delete by id.
#[instrument(skip_all, fields(id = ?state.id))]
pub async fn delete(client: &ApiClient, state: &SourceState) -> Result<(), ProviderError> {
    let source_id = require_id(SOURCE, &state.id)?;
    client.delete_source(source_id).await?;
    info!(source_id, "source deleted");
    Ok(())
}
