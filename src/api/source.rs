//! Source endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::optional::Optional;

/// Body of `sources/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCreate {
    /// Source definition the source is built on.
    pub source_definition_id: String,
    /// Workspace the source belongs to.
    pub workspace_id: String,
    /// Source name.
    pub name: String,
    /// Connector configuration, opaque to the provider.
    pub connection_configuration: Map<String, Value>,
}

/// Body of `sources/update`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUpdate {
    /// Source to update.
    pub source_id: String,
    /// New source name.
    pub name: String,
    /// Connector configuration, opaque to the provider.
    pub connection_configuration: Map<String, Value>,
}

/// Body of the source get and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceIdBody {
    /// Source id.
    pub source_id: String,
}

/// Source as returned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Server-assigned source id.
    pub source_id: String,
    /// Source definition the source is built on.
    pub source_definition_id: String,
    /// Workspace the source belongs to.
    pub workspace_id: String,
    /// Source name.
    pub name: String,
    /// Name of the source definition.
    #[serde(default)]
    pub source_name: Optional<String>,
    /// Icon URL shown in the UI.
    #[serde(default)]
    pub icon: Optional<String>,
    /// Connector configuration, opaque to the provider.
    #[serde(default)]
    pub connection_configuration: Map<String, Value>,
}

impl ApiClient {
    /// `sources/create`.
    pub async fn create_source(&self, body: &SourceCreate) -> Result<Source, ProviderError> {
        self.post("sources/create", body).await
    }

    /// `sources/get`.
    pub async fn get_source(&self, source_id: &str) -> Result<Source, ProviderError> {
        let body = SourceIdBody {
            source_id: source_id.to_string(),
        };
        self.post("sources/get", &body).await
    }

    /// `sources/update`.
    pub async fn update_source(&self, body: &SourceUpdate) -> Result<Source, ProviderError> {
        self.post("sources/update", body).await
    }

    /// `sources/delete`.
    pub async fn delete_source(&self, source_id: &str) -> Result<(), ProviderError> {
        let body = SourceIdBody {
            source_id: source_id.to_string(),
        };
        self.post_no_content("sources/delete", &body).await
    }
}
