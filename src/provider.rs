//! The Airbyte provider.
//!
//! [`AirbyteProvider`] implements [`ProviderService`] for the
//! `airbyte_workspace`, `airbyte_sourcedefinition` and `airbyte_source`
//! resources, plus the `airbyte_workspace` and `airbyte_sourcedefinition`
//! data sources. Attribute bags are checked against the resource schema,
//! decoded into typed state, and dispatched to the handlers in
//! [`crate::resources`].

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::client::ApiClient;
use crate::config::{self, ProviderConfig};
use crate::error::ProviderError;
use crate::resources::source::{self, SourceState};
use crate::resources::source_definition::{self, SourceDefinitionState};
use crate::resources::workspace::{self, WorkspaceLookup, WorkspaceState};
use crate::resources::{
    decode_state, encode_state, require_id, SOURCE, SOURCE_DEFINITION, WORKSPACE,
};
use crate::schema::{Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::ImportedResource;
use crate::validation;

/// Provider for an Airbyte server.
#[derive(Debug, Default)]
pub struct AirbyteProvider {
    client: RwLock<Option<ApiClient>>,
}

impl AirbyteProvider {
    /// An unconfigured provider. Resource operations fail until
    /// [`ProviderService::configure`] succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that is already configured with `client`.
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    async fn client(&self) -> Result<ApiClient, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration("provider has not been configured".to_string())
        })
    }
}

fn resource_schema(resource_type: &str) -> Result<Schema, ProviderError> {
    match resource_type {
        WORKSPACE => Ok(workspace::schema()),
        SOURCE_DEFINITION => Ok(source_definition::schema()),
        SOURCE => Ok(source::schema()),
        other => Err(unknown_resource(other)),
    }
}

fn data_source_schema(data_source_type: &str) -> Result<Schema, ProviderError> {
    match data_source_type {
        WORKSPACE => Ok(workspace::data_source_schema()),
        SOURCE_DEFINITION => Ok(source_definition::data_source_schema()),
        other => Err(unknown_data_source(other)),
    }
}

fn unknown_resource(resource_type: &str) -> ProviderError {
    ProviderError::UnknownResource(resource_type.to_string())
}

fn unknown_data_source(data_source_type: &str) -> ProviderError {
    ProviderError::UnknownResource(format!("{} (data source)", data_source_type))
}

/// Reject a bag that fails schema validation, before any request is made.
fn check_schema(resource_type: &str, schema: &Schema, value: &Value) -> Result<(), ProviderError> {
    validation::validate_result(schema, value).map_err(|diagnostics| {
        let reasons: Vec<String> = diagnostics
            .iter()
            .map(|d| match &d.detail {
                Some(detail) => format!("{} ({})", d.summary, detail),
                None => d.summary.clone(),
            })
            .collect();
        ProviderError::Validation(format!(
            "invalid {} configuration: {}",
            resource_type,
            reasons.join("; ")
        ))
    })
}

/// Checks the schema cannot express, run on the decoded state.
fn typed_checks(resource_type: &str, config: Value) -> Result<(), ProviderError> {
    match resource_type {
        SOURCE_DEFINITION => {
            let state: SourceDefinitionState = decode_state(resource_type, config)?;
            state.resource_requirements().map(|_| ())
        },
        WORKSPACE => decode_state::<WorkspaceState>(resource_type, config).map(|_| ()),
        SOURCE => decode_state::<SourceState>(resource_type, config).map(|_| ()),
        other => Err(unknown_resource(other)),
    }
}

#[async_trait::async_trait]
impl ProviderService for AirbyteProvider {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new()
            .with_provider_config(config::schema())
            .with_resource(WORKSPACE, workspace::schema())
            .with_resource(SOURCE_DEFINITION, source_definition::schema())
            .with_resource(SOURCE, source::schema())
            .with_data_source(WORKSPACE, workspace::data_source_schema())
            .with_data_source(SOURCE_DEFINITION, source_definition::data_source_schema())
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = validation::validate(&config::schema(), &config);
        if !diagnostics.is_empty() {
            return Ok(diagnostics);
        }
        let checked = ProviderConfig::from_value(config).and_then(|c| c.resolve_host_url());
        if let Err(err) = checked {
            diagnostics.push(err.to_diagnostic().with_attribute("host_url"));
        }
        Ok(diagnostics)
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let host_url = ProviderConfig::from_value(config)?.resolve_host_url()?;
        let client = ApiClient::new(host_url)?;
        info!(host_url = %client.host_url(), "provider configured");
        *self.client.write().await = Some(client);
        Ok(vec![])
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = resource_schema(resource_type)?;
        let diagnostics = validation::validate(&schema, &config);
        if !diagnostics.is_empty() {
            return Ok(diagnostics);
        }
        Ok(typed_checks(resource_type, config)
            .err()
            .map(|err| err.to_diagnostic())
            .into_iter()
            .collect())
    }

    #[instrument(skip(self, planned_state))]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        check_schema(resource_type, &resource_schema(resource_type)?, &planned_state)?;
        let client = self.client().await?;
        match resource_type {
            WORKSPACE => {
                let state = decode_state(resource_type, planned_state)?;
                encode_state(&workspace::create(&client, &state).await?)
            },
            SOURCE_DEFINITION => {
                let state = decode_state(resource_type, planned_state)?;
                encode_state(&source_definition::create(&client, &state).await?)
            },
            SOURCE => {
                let state = decode_state(resource_type, planned_state)?;
                encode_state(&source::create(&client, &state).await?)
            },
            other => Err(unknown_resource(other)),
        }
    }

    #[instrument(skip(self, current_state))]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let client = self.client().await?;
        match resource_type {
            WORKSPACE => {
                let state = decode_state(resource_type, current_state)?;
                encode_state(&workspace::read(&client, &state).await?)
            },
            SOURCE_DEFINITION => {
                let state = decode_state(resource_type, current_state)?;
                encode_state(&source_definition::read(&client, &state).await?)
            },
            SOURCE => {
                let state = decode_state(resource_type, current_state)?;
                encode_state(&source::read(&client, &state).await?)
            },
            other => Err(unknown_resource(other)),
        }
    }

    #[instrument(skip(self, prior_state, planned_state))]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        check_schema(resource_type, &resource_schema(resource_type)?, &planned_state)?;
        let client = self.client().await?;
        match resource_type {
            WORKSPACE => {
                let prior: WorkspaceState = decode_state(resource_type, prior_state)?;
                let mut planned: WorkspaceState = decode_state(resource_type, planned_state)?;
                planned.id = planned.id.or(prior.id);
                encode_state(&workspace::update(&client, &planned).await?)
            },
            SOURCE_DEFINITION => {
                let prior: SourceDefinitionState = decode_state(resource_type, prior_state)?;
                let mut planned: SourceDefinitionState = decode_state(resource_type, planned_state)?;
                planned.id = planned.id.or(prior.id);
                encode_state(&source_definition::update(&client, &planned).await?)
            },
            SOURCE => {
                let prior: SourceState = decode_state(resource_type, prior_state)?;
                let mut planned: SourceState = decode_state(resource_type, planned_state)?;
                planned.id = planned.id.or(prior.id);
                encode_state(&source::update(&client, &planned).await?)
            },
            other => Err(unknown_resource(other)),
        }
    }

    #[instrument(skip(self, current_state))]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let client = self.client().await?;
        match resource_type {
            WORKSPACE => workspace::delete(&client, &decode_state(resource_type, current_state)?).await,
            SOURCE_DEFINITION => {
                source_definition::delete(&client, &decode_state(resource_type, current_state)?).await
            },
            SOURCE => source::delete(&client, &decode_state(resource_type, current_state)?).await,
            other => Err(unknown_resource(other)),
        }
    }

    #[instrument(skip(self))]
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let client = self.client().await?;
        let state = match resource_type {
            WORKSPACE => encode_state(&workspace::read_by_id(&client, id).await?)?,
            SOURCE_DEFINITION => encode_state(&source_definition::read_by_id(&client, id).await?)?,
            SOURCE => encode_state(&source::read_by_id(&client, id).await?)?,
            other => return Err(unknown_resource(other)),
        };
        debug!(resource_type, id, "resource imported");
        Ok(vec![ImportedResource::new(resource_type, state)])
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = data_source_schema(data_source_type)?;
        let diagnostics = validation::validate(&schema, &config);
        if !diagnostics.is_empty() {
            return Ok(diagnostics);
        }
        let checked = match data_source_type {
            WORKSPACE => decode_state::<WorkspaceState>(data_source_type, config)
                .and_then(|query| WorkspaceLookup::from_state(&query).map(|_| ())),
            SOURCE_DEFINITION => {
                decode_state::<SourceDefinitionState>(data_source_type, config).map(|_| ())
            },
            other => Err(unknown_data_source(other)),
        };
        Ok(checked.err().map(|err| err.to_diagnostic()).into_iter().collect())
    }

    #[instrument(skip(self, config))]
    async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value, ProviderError> {
        let schema = data_source_schema(data_source_type)?;
        check_schema(data_source_type, &schema, &config)?;
        match data_source_type {
            WORKSPACE => {
                let query: WorkspaceState = decode_state(data_source_type, config)?;
                // Both keys set is a configuration error; reject it before any request.
                WorkspaceLookup::from_state(&query)?;
                let client = self.client().await?;
                encode_state(&workspace::lookup(&client, &query).await?)
            },
            SOURCE_DEFINITION => {
                let query: SourceDefinitionState = decode_state(data_source_type, config)?;
                let id = require_id(data_source_type, &query.id)?;
                let client = self.client().await?;
                encode_state(&source_definition::read_by_id(&client, id).await?)
            },
            other => Err(unknown_data_source(other)),
        }
    }
}
