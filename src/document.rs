//! Wire document sent to the catalog.
//!
//! Types here mirror `schema/catalog_document.schema.json`. The document is
//! assembled once per run from the two optional inputs: every file entry
//! first, then every graph entry, each in enumeration order.

use crate::error::{InputError, SerializationError};
use crate::inputs::{FilesInput, RdfInput};
use crate::resource::Resource;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of the running pipeline.
///
/// Hosts hand out numeric ids; string ids are accepted so the document can be
/// produced outside such a host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineId {
    Number(u64),
    Text(String),
}

impl PipelineId {
    /// Numeric when `raw` parses as one, text otherwise.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(number) => PipelineId::Number(number),
            Err(_) => PipelineId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineId::Number(number) => write!(f, "{number}"),
            PipelineId::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for PipelineId {
    fn from(value: u64) -> Self {
        PipelineId::Number(value)
    }
}

/// Kind of storage a published resource lives in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StorageKind {
    File,
    Rdf,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::File => "FILE",
            StorageKind::Rdf => "RDF",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "FILE" => Some(StorageKind::File),
            "RDF" => Some(StorageKind::Rdf),
            _ => None,
        }
    }
}

impl Serialize for StorageKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StorageKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).ok_or_else(|| {
            serde::de::Error::unknown_variant(&value, &["FILE", "RDF"])
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Typed external identifier of a published resource.
pub struct StorageId {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One `{storageId, resource}` pair of the document.
pub struct ResourceEntry {
    pub storage_id: StorageId,
    pub resource: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload POSTed to the catalog.
pub struct CatalogDocument {
    pub pipeline_id: PipelineId,
    pub resources: Vec<ResourceEntry>,
}

impl CatalogDocument {
    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Pick the published identifier for an entry.
///
/// A missing or empty virtual identifier falls back to the symbolic name.
pub fn resolve_storage_id(virtual_id: Option<String>, symbolic_name: &str) -> String {
    match virtual_id {
        Some(id) if !id.is_empty() => id,
        _ => symbolic_name.to_string(),
    }
}

/// Build the document from whichever inputs are connected.
///
/// Callers are expected to reject the both-absent case before getting here;
/// this function happily builds an empty resource list.
pub fn assemble(
    pipeline_id: PipelineId,
    files: Option<&dyn FilesInput>,
    rdf: Option<&dyn RdfInput>,
) -> Result<CatalogDocument, InputError> {
    let mut resources = Vec::new();

    if let Some(files) = files {
        for entry in files.files()? {
            let virtual_path = files.virtual_path(&entry.symbolic_name)?;
            let storage_id = resolve_storage_id(virtual_path, &entry.symbolic_name);
            let resource = files.resource(&entry.symbolic_name)?;
            resources.push(build_entry(StorageKind::File, storage_id, resource));
        }
    }

    if let Some(rdf) = rdf {
        for entry in rdf.graphs()? {
            let virtual_graph = rdf.virtual_graph(&entry.symbolic_name)?;
            let storage_id = resolve_storage_id(virtual_graph, &entry.symbolic_name);
            let resource = rdf.resource(&entry.symbolic_name)?;
            resources.push(build_entry(StorageKind::Rdf, storage_id, resource));
        }
    }

    Ok(CatalogDocument {
        pipeline_id,
        resources,
    })
}

fn build_entry(
    kind: StorageKind,
    storage_id: String,
    mut resource: Resource,
) -> ResourceEntry {
    resource.set_name(storage_id.clone());
    ResourceEntry {
        storage_id: StorageId {
            kind,
            value: storage_id,
        },
        resource: resource.flatten(),
    }
}
