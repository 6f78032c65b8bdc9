//! Source definition endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::optional::Optional;

/// Job phases a connector can run in. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// `get_spec`
    GetSpec,
    /// `check_connection`
    CheckConnection,
    /// `discover_schema`
    DiscoverSchema,
    /// `sync`
    Sync,
    /// `reset_connection`
    ResetConnection,
    /// `connection_updater`
    ConnectionUpdater,
    /// `replicate`
    Replicate,
}

impl JobType {
    /// Every job type, in the order the API documents them.
    pub const ALL: [JobType; 7] = [
        JobType::GetSpec,
        JobType::CheckConnection,
        JobType::DiscoverSchema,
        JobType::Sync,
        JobType::ResetConnection,
        JobType::ConnectionUpdater,
        JobType::Replicate,
    ];

    /// Literal name the API uses.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::GetSpec => "get_spec",
            JobType::CheckConnection => "check_connection",
            JobType::DiscoverSchema => "discover_schema",
            JobType::Sync => "sync",
            JobType::ResetConnection => "reset_connection",
            JobType::ConnectionUpdater => "connection_updater",
            JobType::Replicate => "replicate",
        }
    }

    /// Literal names of every job type.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(JobType::as_str)
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|job_type| job_type.as_str() == s)
            .ok_or_else(|| {
                ProviderError::Validation(format!(
                    "unknown job_type \"{}\", expected one of: {}",
                    s,
                    Self::names().collect::<Vec<_>>().join(", ")
                ))
            })
    }
}

/// CPU and memory request/limit quadruple. The API spells these keys in snake case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// CPU requested.
    #[serde(default, skip_serializing_if = "Optional::is_unset")]
    pub cpu_request: Optional<String>,
    /// CPU limit.
    #[serde(default, skip_serializing_if = "Optional::is_unset")]
    pub cpu_limit: Optional<String>,
    /// Memory requested.
    #[serde(default, skip_serializing_if = "Optional::is_unset")]
    pub memory_request: Optional<String>,
    /// Memory limit.
    #[serde(default, skip_serializing_if = "Optional::is_unset")]
    pub memory_limit: Optional<String>,
}

/// Requirements override for one job type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTypeResourceLimit {
    /// Job phase the override applies to.
    pub job_type: JobType,
    /// Requirements for this job type.
    #[serde(default)]
    pub resource_requirements: Requirements,
}

/// Default requirements plus per-job-type overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    /// Requirements for every job.
    #[serde(default, skip_serializing_if = "Optional::is_unset")]
    pub default: Optional<Requirements>,
    /// Per-job-type overrides.
    #[serde(default, skip_serializing_if = "Optional::is_unset")]
    pub job_specific: Optional<Vec<JobTypeResourceLimit>>,
}

/// Body of `source_definitions/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDefinitionCreate {
    /// Connector name.
    pub name: String,
    /// Image repository.
    pub docker_repository: String,
    /// Image tag.
    pub docker_image_tag: String,
    /// Connector documentation URL.
    pub documentation_url: String,
    /// Icon URL shown in the UI.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub icon: Optional<String>,
    /// Resource requirement policy.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub resource_requirements: Optional<ResourceRequirements>,
}

/// Body of `source_definitions/update`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDefinitionUpdate {
    /// Source definition to update.
    pub source_definition_id: String,
    /// New image tag.
    pub docker_image_tag: String,
    /// Resource requirement policy.
    #[serde(skip_serializing_if = "Optional::is_unset")]
    pub resource_requirements: Optional<ResourceRequirements>,
}

/// Body of the source definition get and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDefinitionIdBody {
    /// Source definition id.
    pub source_definition_id: String,
}

/// Source definition as returned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDefinition {
    /// Server-assigned id.
    pub source_definition_id: String,
    /// Connector name.
    pub name: String,
    /// Image repository.
    pub docker_repository: String,
    /// Image tag.
    pub docker_image_tag: String,
    /// Connector documentation URL.
    #[serde(default)]
    pub documentation_url: Optional<String>,
    /// Icon URL shown in the UI.
    #[serde(default)]
    pub icon: Optional<String>,
    /// Airbyte protocol version the connector speaks.
    #[serde(default)]
    pub protocol_version: Optional<String>,
    /// One of `alpha`, `beta`, `generally_available` or `custom`.
    #[serde(default)]
    pub release_stage: Optional<String>,
    /// First release date, `yyyy-mm-dd`.
    #[serde(default)]
    pub release_date: Optional<String>,
    /// One of `api`, `file`, `database` or `custom`.
    #[serde(default)]
    pub source_type: Optional<String>,
    /// Resource requirement policy.
    #[serde(default)]
    pub resource_requirements: Optional<ResourceRequirements>,
}

impl ApiClient {
    /// `source_definitions/create`.
    pub async fn create_source_definition(
        &self,
        body: &SourceDefinitionCreate,
    ) -> Result<SourceDefinition, ProviderError> {
        self.post("source_definitions/create", body).await
    }

    /// `source_definitions/get`.
    pub async fn get_source_definition(
        &self,
        source_definition_id: &str,
    ) -> Result<SourceDefinition, ProviderError> {
        let body = SourceDefinitionIdBody {
            source_definition_id: source_definition_id.to_string(),
        };
        self.post("source_definitions/get", &body).await
    }

    /// `source_definitions/update`.
    pub async fn update_source_definition(
        &self,
        body: &SourceDefinitionUpdate,
    ) -> Result<SourceDefinition, ProviderError> {
        self.post("source_definitions/update", body).await
    }

    /// `source_definitions/delete`.
    pub async fn delete_source_definition(
        &self,
        source_definition_id: &str,
    ) -> Result<(), ProviderError> {
        let body = SourceDefinitionIdBody {
            source_definition_id: source_definition_id.to_string(),
        };
        self.post_no_content("source_definitions/delete", &body)
            .await
    }
}
