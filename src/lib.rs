//! Airbyte Provider
//!
//! A declarative infrastructure provider for [Airbyte](https://airbyte.com):
//! it manages workspaces, source definitions and sources through Airbyte's
//! configuration API, and looks up existing workspaces and source
//! definitions as data sources.
//!
//! # Overview
//!
//! - **ProviderService trait**: the operations a host drives (configure, validate,
//!   plan, create, read, update, delete, import, read data source)
//! - **AirbyteProvider**: the implementation for `airbyte_workspace`,
//!   `airbyte_sourcedefinition` and `airbyte_source`
//! - **Schema types**: typed descriptions of every resource and data source
//! - **Optional**: presence-aware fields, so `false` and "not set" never collapse
//! - **ApiClient**: the HTTP client for the Airbyte configuration API
//! - **Error types**: one error enum, convertible to host diagnostics
//! - **Logging**: integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use airbyte_provider::{AirbyteProvider, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     airbyte_provider::init_logging();
//!
//!     let provider = AirbyteProvider::new();
//!     provider.configure(json!({"host_url": "http://localhost:8000"})).await?;
//!
//!     let workspace = provider
//!         .create("airbyte_workspace", json!({"name": "analytics", "news": false}))
//!         .await?;
//!     println!("created workspace {}", workspace["id"]);
//!     Ok(())
//! }
//! ```
//!
//! # Presence
//!
//! Every optional field on the wire is an [`Optional`]. A field the user set,
//! even to `false` or `""`, is sent; a field the user left out is omitted so
//! the server keeps its default. Responses are read the same way: a field the
//! server omitted stays unset in state instead of becoming a zero value.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod config;
pub mod docs;
pub mod error;
pub mod logging;
pub mod optional;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::ApiClient;
pub use config::ProviderConfig;
pub use docs::{render_schema_docs, DescriptionKind, DocsOptions};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use optional::Optional;
pub use provider::AirbyteProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
