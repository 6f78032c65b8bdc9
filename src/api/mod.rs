//! Wire models and endpoint bindings for the Airbyte configuration API.
//!
//! Request bodies skip every [`crate::Optional::Unset`] field so the server's
//! own defaulting applies. Read models decode absent or `null` fields as
//! `Unset`.

pub mod source;
pub mod source_definition;
pub mod workspace;

pub use source::{Source, SourceCreate, SourceIdBody, SourceUpdate};
pub use source_definition::{
    JobType, JobTypeResourceLimit, Requirements, ResourceRequirements, SourceDefinition,
    SourceDefinitionCreate, SourceDefinitionIdBody, SourceDefinitionUpdate,
};
pub use workspace::{
    CommonWorkspaceFields, Notification, SlackConfiguration, SlugBody, Workspace,
    WorkspaceCreate, WorkspaceIdBody, WorkspaceUpdate,
};
