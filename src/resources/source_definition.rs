//! `airbyte_sourcedefinition` resource and data source.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{require_id, SOURCE_DEFINITION};
use crate::api::{
    JobType, JobTypeResourceLimit, Requirements, ResourceRequirements, SourceDefinition,
    SourceDefinitionCreate, SourceDefinitionUpdate,
};
use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::optional::Optional;
use crate::schema::{Attribute, Block, NestedBlock, Schema};

const DEFAULT_REQUIREMENTS_DESCRIPTION: &str = "Actor definition specific resource requirements. \
     If default is set, these are the requirements that should be set for ALL jobs run for this \
     actor definition. It is overridden by the job type specific configurations. If not set, the \
     platform will use defaults. These values will be overridden by configuration at the \
     connection level.";
const JOB_REQUIREMENTS_DESCRIPTION: &str = "Sets resource requirements for a specific job type \
     for an actor definition. These values override the default, if both are set. These values \
     will be overridden by configuration at the connection level.";

/// Source definition state as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceDefinitionState {
    /// Server-assigned source definition id.
    pub id: Optional<String>,
    /// Connector name.
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    /// Image repository.
    #[serde(deserialize_with = "super::null_as_default")]
    pub docker_repository: String,
    /// Image tag.
    #[serde(deserialize_with = "super::null_as_default")]
    pub docker_image_tag: String,
    /// Connector documentation URL.
    #[serde(deserialize_with = "super::null_as_default")]
    pub documentation_url: String,
    /// Icon URL shown in the UI.
    pub icon: Optional<String>,
    /// Airbyte protocol version the connector speaks.
    pub protocol_version: Optional<String>,
    /// One of `alpha`, `beta`, `generally_available` or `custom`.
    pub release_stage: Optional<String>,
    /// First release date, `yyyy-mm-dd`.
    pub release_date: Optional<String>,
    /// One of `api`, `file`, `database` or `custom`.
    pub source_type: Optional<String>,
    /// Requirements for every job, at most one block.
    pub default_resource_requirements: Optional<Vec<RequirementsConfig>>,
    /// Per-job-type overrides.
    pub job_specific_resource_requirements: Optional<Vec<JobRequirementsConfig>>,
}

/// The `default_resource_requirements` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementsConfig {
    /// CPU requested.
    pub cpu_request: Optional<String>,
    /// CPU limit.
    pub cpu_limit: Optional<String>,
    /// Memory requested.
    pub memory_request: Optional<String>,
    /// Memory limit.
    pub memory_limit: Optional<String>,
}

/// One `job_specific_resource_requirements` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirementsConfig {
    /// Job phase the override applies to.
    #[serde(deserialize_with = "super::null_as_default")]
    pub job_type: String,
    /// CPU requested.
    pub cpu_request: Optional<String>,
    /// CPU limit.
    pub cpu_limit: Optional<String>,
    /// Memory requested.
    pub memory_request: Optional<String>,
    /// Memory limit.
    pub memory_limit: Optional<String>,
}

impl RequirementsConfig {
    fn to_wire(&self) -> Requirements {
        Requirements {
            cpu_request: self.cpu_request.clone(),
            cpu_limit: self.cpu_limit.clone(),
            memory_request: self.memory_request.clone(),
            memory_limit: self.memory_limit.clone(),
        }
    }

    fn from_wire(reqs: Requirements) -> Self {
        Self {
            cpu_request: reqs.cpu_request,
            cpu_limit: reqs.cpu_limit,
            memory_request: reqs.memory_request,
            memory_limit: reqs.memory_limit,
        }
    }
}

impl JobRequirementsConfig {
    fn to_wire(&self) -> Result<JobTypeResourceLimit, ProviderError> {
        Ok(JobTypeResourceLimit {
            job_type: self.job_type.parse()?,
            resource_requirements: Requirements {
                cpu_request: self.cpu_request.clone(),
                cpu_limit: self.cpu_limit.clone(),
                memory_request: self.memory_request.clone(),
                memory_limit: self.memory_limit.clone(),
            },
        })
    }

    fn from_wire(limit: JobTypeResourceLimit) -> Self {
        let reqs = limit.resource_requirements;
        Self {
            job_type: limit.job_type.to_string(),
            cpu_request: reqs.cpu_request,
            cpu_limit: reqs.cpu_limit,
            memory_request: reqs.memory_request,
            memory_limit: reqs.memory_limit,
        }
    }
}

impl SourceDefinitionState {
    /// Requirements to send, or `Unset` when neither block is configured.
    pub fn resource_requirements(&self) -> Result<Optional<ResourceRequirements>, ProviderError> {
        let default: Optional<Requirements> = match self.default_resource_requirements.as_present() {
            Some(defaults) if defaults.len() > 1 => {
                return Err(ProviderError::Validation(
                    "default_resource_requirements accepts at most one block".to_string(),
                ))
            },
            Some(defaults) => defaults
                .first()
                .map(RequirementsConfig::to_wire)
                .into(),
            None => Optional::Unset,
        };

        let job_specific = match self.job_specific_resource_requirements.as_present() {
            Some(limits) => Optional::Present(
                limits
                    .iter()
                    .map(JobRequirementsConfig::to_wire)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => Optional::Unset,
        };

        if default.is_unset() && job_specific.is_unset() {
            return Ok(Optional::Unset);
        }
        Ok(Optional::Present(ResourceRequirements {
            default,
            job_specific,
        }))
    }

    /// Body for `source_definitions/create`.
    pub fn to_create(&self) -> Result<SourceDefinitionCreate, ProviderError> {
        Ok(SourceDefinitionCreate {
            name: self.name.clone(),
            docker_repository: self.docker_repository.clone(),
            docker_image_tag: self.docker_image_tag.clone(),
            documentation_url: self.documentation_url.clone(),
            icon: self.icon.clone(),
            resource_requirements: self.resource_requirements()?,
        })
    }

    /// Body for `source_definitions/update`.
    pub fn to_update(&self) -> Result<SourceDefinitionUpdate, ProviderError> {
        Ok(SourceDefinitionUpdate {
            source_definition_id: require_id(SOURCE_DEFINITION, &self.id)?.to_string(),
            docker_image_tag: self.docker_image_tag.clone(),
            resource_requirements: self.resource_requirements()?,
        })
    }

    /// State reported by the server.
    pub fn from_wire(definition: SourceDefinition) -> Self {
        let reqs = definition.resource_requirements.unwrap_or_default();
        Self {
            id: Optional::Present(definition.source_definition_id),
            name: definition.name,
            docker_repository: definition.docker_repository,
            docker_image_tag: definition.docker_image_tag,
            documentation_url: definition.documentation_url.unwrap_or_default(),
            icon: definition.icon,
            protocol_version: definition.protocol_version,
            release_stage: definition.release_stage,
            release_date: definition.release_date,
            source_type: definition.source_type,
            default_resource_requirements: Optional::Present(
                reqs.default
                    .into_option()
                    .map(RequirementsConfig::from_wire)
                    .into_iter()
                    .collect(),
            ),
            job_specific_resource_requirements: Optional::Present(
                reqs.job_specific
                    .unwrap_or_default()
                    .into_iter()
                    .map(JobRequirementsConfig::from_wire)
                    .collect(),
            ),
        }
    }
}

/// A 500 on create or update means the server could not pull the image.
fn classify(operation: &'static str, err: ProviderError) -> ProviderError {
    if err.status() == Some(500) {
        warn!(operation, error = %err, "source definition image unresolvable");
        ProviderError::ImageUnresolvable {
            operation,
            detail: err.to_string(),
        }
    } else {
        err
    }
}

fn requirement_attribute(description: &str) -> Attribute {
    Attribute::optional_computed_string().with_description(description)
}

/// Resource schema.
pub fn schema() -> Schema {
    let defaults = Block::new()
        .with_attribute("cpu_request", requirement_attribute("CPU Requested"))
        .with_attribute("cpu_limit", requirement_attribute("CPU Limit"))
        .with_attribute("memory_request", requirement_attribute("Memory Requested"))
        .with_attribute("memory_limit", requirement_attribute("Memory Limit"));

    let job_specific = Block::new()
        .with_attribute(
            "job_type",
            Attribute::required_string()
                .with_description(format!(
                    "Allowed: {}",
                    JobType::names().collect::<Vec<_>>().join(" | ")
                ))
                .with_allowed_values(JobType::names()),
        )
        .with_attribute(
            "cpu_request",
            Attribute::optional_string().with_description("CPU Requested"),
        )
        .with_attribute(
            "cpu_limit",
            Attribute::optional_string().with_description("CPU Limit"),
        )
        .with_attribute(
            "memory_request",
            Attribute::optional_string().with_description("Memory Requested"),
        )
        .with_attribute(
            "memory_limit",
            Attribute::optional_string().with_description("Memory Limit"),
        );

    Schema::v0()
        .with_description("Airbyte Source Definition")
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("Source Definition ID"),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("Source Definition Name")
                .with_force_new(),
        )
        .with_attribute(
            "docker_repository",
            Attribute::required_string()
                .with_description(
                    "Docker Repository URL (e.g. 112233445566.dkr.ecr.us-east-1.amazonaws.com/source-custom) \
                     or DockerHub identifier (e.g. airbyte/source-postgres)",
                )
                .with_force_new(),
        )
        .with_attribute(
            "docker_image_tag",
            Attribute::required_string().with_description("Docker image tag"),
        )
        .with_attribute(
            "documentation_url",
            Attribute::required_string()
                .with_description("Documentation URL")
                .with_force_new(),
        )
        .with_attribute(
            "icon",
            Attribute::optional_computed_string()
                .with_description("URL for the icon displayed in the UI")
                .with_force_new(),
        )
        .with_attribute(
            "protocol_version",
            Attribute::computed_string()
                .with_description("The Airbyte Protocol version supported by the connector"),
        )
        .with_attribute(
            "release_stage",
            Attribute::computed_string()
                .with_description("Allowed: alpha | beta | generally_available | custom"),
        )
        .with_attribute(
            "release_date",
            Attribute::computed_string().with_description(
                "The date when this connector was first released, in yyyy-mm-dd format",
            ),
        )
        .with_attribute(
            "source_type",
            Attribute::computed_string().with_description("Allowed: api | file | database | custom"),
        )
        .with_block(
            "default_resource_requirements",
            NestedBlock::list(defaults.with_description(DEFAULT_REQUIREMENTS_DESCRIPTION))
                .with_max_items(1)
                .with_computed(),
        )
        .with_block(
            "job_specific_resource_requirements",
            NestedBlock::list(job_specific.with_description(JOB_REQUIREMENTS_DESCRIPTION))
                .with_computed(),
        )
}

/// Data source schema: look a source definition up by id.
pub fn data_source_schema() -> Schema {
    let quadruple = |block: Block| {
        block
            .with_attribute("cpu_request", Attribute::computed_string().with_description("CPU Requested"))
            .with_attribute("cpu_limit", Attribute::computed_string().with_description("CPU Limit"))
            .with_attribute(
                "memory_request",
                Attribute::computed_string().with_description("Memory Requested"),
            )
            .with_attribute(
                "memory_limit",
                Attribute::computed_string().with_description("Memory Limit"),
            )
    };

    Schema::v0()
        .with_description("Get an Airbyte Source Definition by id")
        .with_attribute(
            "id",
            Attribute::required_string().with_description("Source Definition ID"),
        )
        .with_attribute(
            "name",
            Attribute::computed_string().with_description("Source Definition Name"),
        )
        .with_attribute(
            "docker_repository",
            Attribute::computed_string().with_description("Docker Repository URL or DockerHub identifier"),
        )
        .with_attribute(
            "docker_image_tag",
            Attribute::computed_string().with_description("Docker image tag"),
        )
        .with_attribute(
            "documentation_url",
            Attribute::computed_string().with_description("Documentation URL"),
        )
        .with_attribute(
            "icon",
            Attribute::computed_string().with_description("URL for the icon displayed in the UI"),
        )
        .with_attribute(
            "protocol_version",
            Attribute::computed_string()
                .with_description("The Airbyte Protocol version supported by the connector"),
        )
        .with_attribute(
            "release_stage",
            Attribute::computed_string()
                .with_description("Allowed: alpha | beta | generally_available | custom"),
        )
        .with_attribute(
            "release_date",
            Attribute::computed_string().with_description(
                "The date when this connector was first released, in yyyy-mm-dd format",
            ),
        )
        .with_attribute(
            "source_type",
            Attribute::computed_string().with_description("Allowed: api | file | database | custom"),
        )
        .with_block(
            "default_resource_requirements",
            NestedBlock::list(quadruple(Block::new().with_description(DEFAULT_REQUIREMENTS_DESCRIPTION)))
                .with_max_items(1)
                .with_computed(),
        )
        .with_block(
            "job_specific_resource_requirements",
            NestedBlock::list(quadruple(
                Block::new()
                    .with_description(JOB_REQUIREMENTS_DESCRIPTION)
                    .with_attribute("job_type", Attribute::computed_string()),
            ))
            .with_computed(),
        )
}

/// Create the resource, then read it back.
#[instrument(skip_all, fields(name = %state.name, docker_repository = %state.docker_repository))]
pub async fn create(
    client: &ApiClient,
    state: &SourceDefinitionState,
) -> Result<SourceDefinitionState, ProviderError> {
    let created = client
        .create_source_definition(&state.to_create()?)
        .await
        .map_err(|e| classify("create", e))?;
    info!(source_definition_id = %created.source_definition_id, "source definition created");
    read_by_id(client, &created.source_definition_id).await
}

/// Refresh state from the server.
#[instrument(skip_all)]
pub async fn read(
    client: &ApiClient,
    state: &SourceDefinitionState,
) -> Result<SourceDefinitionState, ProviderError> {
    read_by_id(client, require_id(SOURCE_DEFINITION, &state.id)?).await
}

/// Read by server-assigned id, as import does.
#[instrument(skip(client))]
pub async fn read_by_id(
    client: &ApiClient,
    source_definition_id: &str,
) -> Result<SourceDefinitionState, ProviderError> {
    let definition = client.get_source_definition(source_definition_id).await?;
    Ok(SourceDefinitionState::from_wire(definition))
}

/// Apply the mutable fields, then read back.
#[instrument(skip_all, fields(id = ?state.id, docker_image_tag = %state.docker_image_tag))]
pub async fn update(
    client: &ApiClient,
    state: &SourceDefinitionState,
) -> Result<SourceDefinitionState, ProviderError> {
    let updated = client
        .update_source_definition(&state.to_update()?)
        .await
        .map_err(|e| classify("update", e))?;
    info!(source_definition_id = %updated.source_definition_id, "source definition updated");
    read_by_id(client, &updated.source_definition_id).await
}

/// Delete by id.
#[instrument(skip_all, fields(id = ?state.id))]
pub async fn delete(client: &ApiClient, state: &SourceDefinitionState) -> Result<(), ProviderError> {
    let source_definition_id = require_id(SOURCE_DEFINITION, &state.id)?;
    client.delete_source_definition(source_definition_id).await?;
    info!(source_definition_id, "source definition deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::decode_state;
    use crate::validation::validate;
    use serde_json::json;

    fn configured() -> SourceDefinitionState {
        decode_state(
            SOURCE_DEFINITION,
            json!({
                "name": "custom-source",
                "docker_repository": "airbyte/source-custom",
                "docker_image_tag": "0.1.0",
                "documentation_url": "https://docs.example.com",
                "default_resource_requirements": [{"cpu_limit": "2", "memory_request": null}],
                "job_specific_resource_requirements": [
                    {"job_type": "sync", "memory_limit": "4Gi"}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_create_body() {
        let body = serde_json::to_value(configured().to_create().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "custom-source",
                "dockerRepository": "airbyte/source-custom",
                "dockerImageTag": "0.1.0",
                "documentationUrl": "https://docs.example.com",
                "resourceRequirements": {
                    "default": {"cpu_limit": "2"},
                    "jobSpecific": [{"jobType": "sync", "resourceRequirements": {"memory_limit": "4Gi"}}]
                }
            })
        );
    }

    #[test]
    fn test_requirements_unset_when_no_blocks() {
        let state = SourceDefinitionState {
            name: "custom-source".to_string(),
            ..Default::default()
        };
        assert!(state.resource_requirements().unwrap().is_unset());

        let body = serde_json::to_value(state.to_create().unwrap()).unwrap();
        assert!(body.get("resourceRequirements").is_none());
        assert!(body.get("icon").is_none());
    }

    #[test]
    fn test_empty_job_specific_list_is_sent() {
        let state = SourceDefinitionState {
            job_specific_resource_requirements: Optional::Present(vec![]),
            ..Default::default()
        };
        let reqs = state.resource_requirements().unwrap();
        assert_eq!(
            serde_json::to_value(reqs).unwrap(),
            json!({"jobSpecific": []})
        );
    }

    #[test]
    fn test_unknown_job_type_rejected() {
        let mut state = configured();
        state.job_specific_resource_requirements = Optional::Present(vec![JobRequirementsConfig {
            job_type: "backfill".to_string(),
            ..Default::default()
        }]);
        assert!(matches!(
            state.to_create(),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_more_than_one_default_block_rejected() {
        let mut state = configured();
        state.default_resource_requirements =
            Optional::Present(vec![RequirementsConfig::default(), RequirementsConfig::default()]);
        assert!(state.resource_requirements().is_err());
    }

    #[test]
    fn test_update_body_sends_tag() {
        let mut state = configured();
        state.id = Optional::Present("sd-1".to_string());
        state.default_resource_requirements = Optional::Unset;
        state.job_specific_resource_requirements = Optional::Unset;
        state.docker_image_tag = "0.2.0".to_string();

        assert_eq!(
            serde_json::to_value(state.to_update().unwrap()).unwrap(),
            json!({"sourceDefinitionId": "sd-1", "dockerImageTag": "0.2.0"})
        );
    }

    #[test]
    fn test_from_wire() {
        let definition: SourceDefinition = serde_json::from_value(json!({
            "sourceDefinitionId": "sd-1",
            "name": "custom-source",
            "dockerRepository": "airbyte/source-custom",
            "dockerImageTag": "0.1.0",
            "releaseStage": "custom",
            "resourceRequirements": {
                "jobSpecific": [{"jobType": "check_connection", "resourceRequirements": {"cpu_request": "1"}}]
            }
        }))
        .unwrap();

        let state = SourceDefinitionState::from_wire(definition);
        assert_eq!(state.id, Optional::Present("sd-1".to_string()));
        assert_eq!(state.documentation_url, "");
        assert!(state.icon.is_unset());
        assert_eq!(state.release_stage, Optional::Present("custom".to_string()));
        assert_eq!(state.default_resource_requirements, Optional::Present(vec![]));

        let limits = state.job_specific_resource_requirements.as_present().unwrap();
        assert_eq!(limits[0].job_type, "check_connection");
        assert_eq!(limits[0].cpu_request, Optional::Present("1".to_string()));
        assert!(limits[0].memory_limit.is_unset());
    }

    #[test]
    fn test_classify_maps_only_500() {
        let server_error = ProviderError::Api {
            status: 500,
            body: "image not found".to_string(),
        };
        let mapped = classify("create", server_error);
        assert!(matches!(
            mapped,
            ProviderError::ImageUnresolvable { operation: "create", .. }
        ));
        assert!(mapped
            .to_string()
            .starts_with("Unable to create source definition."));

        let bad_request = ProviderError::Api {
            status: 422,
            body: "invalid".to_string(),
        };
        assert!(matches!(
            classify("update", bad_request),
            ProviderError::Api { status: 422, .. }
        ));
    }

    #[test]
    fn test_schema_restricts_job_type() {
        let diagnostics = validate(
            &schema(),
            &json!({
                "name": "custom-source",
                "docker_repository": "airbyte/source-custom",
                "docker_image_tag": "0.1.0",
                "documentation_url": "https://docs.example.com",
                "job_specific_resource_requirements": [{"job_type": "backfill"}]
            }),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute.as_deref(),
            Some("job_specific_resource_requirements.0.job_type")
        );
    }

    #[test]
    fn test_schema_limits_default_block() {
        let diagnostics = validate(
            &schema(),
            &json!({
                "name": "custom-source",
                "docker_repository": "airbyte/source-custom",
                "docker_image_tag": "0.1.0",
                "documentation_url": "https://docs.example.com",
                "default_resource_requirements": [{}, {}]
            }),
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(schema().block.attributes["docker_repository"].force_new);
        assert!(!schema().block.attributes["docker_image_tag"].force_new);
    }
}
