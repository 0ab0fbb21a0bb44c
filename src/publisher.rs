//! The publish stage: collect, serialize, POST once.
//!
//! A run fails fast when no input is connected, turns metadata problems into
//! [`SerializationError`], and turns URL or network problems into
//! [`TransportError`]. A non-200 reply is logged at error level and reported
//! back in the [`PublishReport`]; it only becomes an error when
//! `fail_on_rejection` is set. Nothing is retried.

use crate::config::PublisherConfig;
use crate::document::{CatalogDocument, PipelineId, assemble};
use crate::error::{PublishError, SerializationError};
use crate::inputs::{FilesInput, RdfInput};
use crate::schema::EmbeddedSchema;
use crate::transport::{CatalogTransport, normalize_endpoint};
use tracing::{error, info};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome of the single HTTP exchange.
pub struct PublishReport {
    pub status: u16,
    pub body: String,
    pub resource_count: usize,
}

impl PublishReport {
    /// True only for HTTP 200.
    pub fn accepted(&self) -> bool {
        self.status == 200
    }
}

/// Publishes one catalog document per call through `T`.
pub struct CatalogPublisher<T> {
    transport: T,
    fail_on_rejection: bool,
}

impl<T: CatalogTransport> CatalogPublisher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            fail_on_rejection: false,
        }
    }

    /// Escalate non-200 replies to [`PublishError::Rejected`].
    pub fn fail_on_rejection(mut self, enabled: bool) -> Self {
        self.fail_on_rejection = enabled;
        self
    }

    /// Run the stage with settings taken from `config`.
    pub fn run(
        transport: T,
        config: &PublisherConfig,
        files: Option<&dyn FilesInput>,
        rdf: Option<&dyn RdfInput>,
    ) -> Result<PublishReport, PublishError> {
        info!(config = %config, "starting catalog publish");
        Self::new(transport)
            .fail_on_rejection(config.fail_on_rejection)
            .publish(
                files,
                rdf,
                config.pipeline_id.clone(),
                &config.catalog_api_location,
            )
    }

    /// Enumerate both inputs, build the document, and POST it to
    /// `catalog_api_location`.
    pub fn publish(
        &self,
        files: Option<&dyn FilesInput>,
        rdf: Option<&dyn RdfInput>,
        pipeline_id: PipelineId,
        catalog_api_location: &str,
    ) -> Result<PublishReport, PublishError> {
        if files.is_none() && rdf.is_none() {
            return Err(PublishError::NoInput);
        }

        let document = assemble(pipeline_id, files, rdf).map_err(SerializationError::from)?;
        let request = serialize_document(&document)?;
        info!("Request (json): {request}");

        let url = normalize_endpoint(catalog_api_location)?;
        let response = self.transport.post_json(&url, &request)?;

        let report = PublishReport {
            status: response.status,
            body: response.body,
            resource_count: document.resources.len(),
        };
        if report.accepted() {
            info!("Response: {}", report.body);
        } else {
            error!(status = report.status, "Response: {}", report.body);
            if self.fail_on_rejection {
                return Err(PublishError::Rejected {
                    status: report.status,
                    body: report.body,
                });
            }
        }
        Ok(report)
    }
}

/// Serialize and schema-check the document.
fn serialize_document(document: &CatalogDocument) -> Result<String, SerializationError> {
    let value = serde_json::to_value(document)?;
    EmbeddedSchema::CatalogDocument
        .validate(&value)
        .map_err(|errors| SerializationError::Schema(errors.join("\n")))?;
    Ok(serde_json::to_string(&value)?)
}
