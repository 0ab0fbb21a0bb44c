//! Error types surfaced by a publish run.
//!
//! Network-level failures and metadata failures abort the run. A non-200 from
//! the catalog is not an error unless the caller opted into
//! `fail_on_rejection`; see [`crate::publisher::CatalogPublisher`].

use thiserror::Error;

/// Terminal failure of a single publish execution.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no input connected: neither files nor rdf input is present")]
    NoInput,
    #[error("failed to export resource metadata: {0}")]
    Serialization(#[from] SerializationError),
    #[error("failed to deliver catalog document: {0}")]
    Transport(#[from] TransportError),
    #[error("catalog rejected the document with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Failure while reading metadata or turning it into the wire document.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("unable to serialize catalog document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog document failed schema validation:\n{0}")]
    Schema(String),
}

/// Failure reported by an input collection while enumerating or looking up
/// entries.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown symbolic name '{0}'")]
    UnknownEntry(String),
    #[error("unsupported metadata for '{name}': {reason}")]
    Unsupported { name: String, reason: String },
}

/// Failure before or during the HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid catalog location '{location}': {source}")]
    InvalidUrl {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme '{scheme}' in catalog location '{location}'")]
    UnsupportedScheme { location: String, scheme: String },
    #[error("unable to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
