//! Delivery of the serialized document to the catalog endpoint.
//!
//! [`CatalogTransport`] is the seam the publisher talks to; [`HttpTransport`]
//! is the blocking reqwest implementation used in production. The response is
//! read to a string inside [`HttpTransport::post_json`] and dropped before it
//! returns, so the connection goes back to the pool (or is closed) on every
//! path, including errors while reading the body.

use crate::error::TransportError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Content type sent with every catalog document.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Status and body of the catalog's reply.
pub struct CatalogResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON body to one URL.
pub trait CatalogTransport {
    fn post_json(&self, url: &Url, body: &str) -> Result<CatalogResponse, TransportError>;
}

impl<T: CatalogTransport + ?Sized> CatalogTransport for &T {
    fn post_json(&self, url: &Url, body: &str) -> Result<CatalogResponse, TransportError> {
        (**self).post_json(url, body)
    }
}

/// Blocking HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Client with reqwest defaults, plus an overall timeout when given.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

impl CatalogTransport for HttpTransport {
    fn post_json(&self, url: &Url, body: &str) -> Result<CatalogResponse, TransportError> {
        let request_error = |source| TransportError::Request {
            url: url.to_string(),
            source,
        };
        debug!(%url, bytes = body.len(), "posting catalog document");
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body.to_string())
            .send()
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(request_error)?;
        Ok(CatalogResponse { status, body })
    }
}

/// Parse the configured catalog location and normalize its path.
///
/// Relative references and non-HTTP schemes are rejected here, before any
/// socket is opened. Dot segments are removed from the path.
pub fn normalize_endpoint(location: &str) -> Result<Url, TransportError> {
    let trimmed = location.trim();
    let url = Url::parse(trimmed).map_err(|source| TransportError::InvalidUrl {
        location: trimmed.to_string(),
        source,
    })?;
    // Parsing a special-scheme URL already resolves `.` and `..` segments.
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransportError::UnsupportedScheme {
            location: trimmed.to_string(),
            scheme: other.to_string(),
        }),
    }
}
