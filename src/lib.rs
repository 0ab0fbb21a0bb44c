//! Shared library for the catalog publish stage.
//!
//! The crate turns the file and graph outputs of a pipeline run into one
//! catalog document and POSTs it to the configured catalog endpoint. Public
//! items here form the contract the `catalog-publish` binary depends on:
//! input traits, the document model, configuration layering, and the
//! publisher itself.

pub mod config;
pub mod document;
pub mod error;
pub mod inputs;
pub mod manifest;
pub mod publisher;
pub mod resource;
pub mod schema;
pub mod transport;

pub use config::{ConfigLayer, PublisherConfig};
pub use document::{
    CatalogDocument, PipelineId, ResourceEntry, StorageId, StorageKind, assemble,
    resolve_storage_id,
};
pub use error::{InputError, PublishError, SerializationError, TransportError};
pub use inputs::{FilesInput, InputEntry, RdfInput, ResourceMetadata};
pub use manifest::InputManifest;
pub use publisher::{CatalogPublisher, PublishReport};
pub use resource::Resource;
pub use transport::{CatalogResponse, CatalogTransport, HttpTransport, normalize_endpoint};

