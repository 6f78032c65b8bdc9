//! Error types for the Airbyte provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider operation.
///
/// Every variant is terminal for the operation that produced it. Nothing is
/// retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The supplied configuration was rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider is not configured, or its configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// An outbound body could not be encoded or an inbound body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request could not be completed (connection, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status outside `[200, 300)`.
    #[error("status: {status}, body: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Airbyte failed with an internal error while creating or updating a
    /// source definition, which almost always means the image is unreachable.
    #[error(
        "Unable to {operation} source definition. Airbyte likely unable to find/access \
         specified docker_repository or docker_image_tag."
    )]
    ImageUnresolvable {
        /// `create` or `update`.
        operation: &'static str,
        /// The underlying API error, verbatim.
        detail: String,
    },

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// Get the error message as a string.
    ///
    /// Returns a reference to the error message for any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) => msg,
            Self::Validation(msg) => msg,
            Self::Configuration(msg) => msg,
            Self::UnknownResource(msg) => msg,
            Self::Serialization(_err) => "serialization error (see Debug output)",
            Self::Transport(_err) => "transport error (see Debug output)",
            Self::Api { body, .. } => body,
            Self::ImageUnresolvable { detail, .. } => detail,
            Self::Unimplemented(msg) => msg,
        }
    }

    /// The HTTP status carried by an [`ProviderError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert into the diagnostic reported to the host.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::ImageUnresolvable { detail, .. } => {
                Diagnostic::error(self.to_string()).with_detail(detail.clone())
            },
            _ => Diagnostic::error(self.to_string()),
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        err.to_diagnostic()
    }
}
