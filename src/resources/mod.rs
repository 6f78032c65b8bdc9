//! Resource translators and lifecycle handlers.
//!
//! Each submodule owns one Airbyte resource type: its host schema, a typed
//! state struct decoded once from the host's attribute bag, the outbound and
//! inbound translations, and the create/read/update/delete handlers. Create
//! and update always finish with a full read so server-computed fields land
//! in state.

pub mod source;
pub mod source_definition;
pub mod workspace;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ProviderError;
use crate::optional::Optional;

/// Resource and data source name for workspaces.
pub const WORKSPACE: &str = "airbyte_workspace";

/// Resource and data source name for source definitions.
pub const SOURCE_DEFINITION: &str = "airbyte_sourcedefinition";

/// Resource name for sources.
pub const SOURCE: &str = "airbyte_source";

/// Decode a host attribute bag into a typed state struct.
///
/// Shape mismatches are configuration errors, reported before any request.
pub fn decode_state<T: DeserializeOwned>(resource_type: &str, value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|e| {
        ProviderError::Validation(format!("invalid {} configuration: {}", resource_type, e))
    })
}

/// Encode a typed state struct back into a host attribute bag.
pub fn encode_state<T: Serialize>(state: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(state)?)
}

/// Reads a plain state field, taking `null` as the type's default.
///
/// Host bags carry every attribute, with unknown computed ones as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The server-assigned id a read, update or delete is keyed by.
pub(crate) fn require_id<'a>(
    resource_type: &str,
    id: &'a Optional<String>,
) -> Result<&'a str, ProviderError> {
    match id.as_present() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ProviderError::Validation(format!(
            "{} state has no id",
            resource_type
        ))),
    }
}
