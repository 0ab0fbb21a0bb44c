//! On-disk description of a run's outputs.
//!
//! The manifest stands in for the pipeline host's file and graph stores when
//! the publisher runs from the CLI. Each section implements the matching input
//! trait; a section that is absent from the JSON means the input is not
//! connected, which is different from an empty list.

use crate::error::InputError;
use crate::inputs::{FilesInput, InputEntry, RdfInput, ResourceMetadata};
use crate::resource::Resource;
use crate::schema::EmbeddedSchema;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
/// Parsed `input_manifest.schema.json` document.
pub struct InputManifest {
    #[serde(default)]
    pub files: Option<FileSection>,
    #[serde(default)]
    pub rdf: Option<GraphSection>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
/// File outputs in enumeration order.
pub struct FileSection {
    pub entries: Vec<FileRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
/// Graph outputs in enumeration order.
pub struct GraphSection {
    pub entries: Vec<GraphRecord>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub symbolic_name: String,
    #[serde(default)]
    pub virtual_path: Option<String>,
    #[serde(default)]
    pub resource: Option<Resource>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRecord {
    pub symbolic_name: String,
    #[serde(default)]
    pub virtual_graph: Option<String>,
    #[serde(default)]
    pub resource: Option<Resource>,
}

impl InputManifest {
    /// Read, schema-check, and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let value: Value = serde_json::from_str(&data)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        Self::from_value(value).with_context(|| format!("loading manifest {}", path.display()))
    }

    /// Schema-check and parse an already decoded manifest.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Err(errors) = EmbeddedSchema::InputManifest.validate(&value) {
            bail!(
                "manifest failed schema validation:\n{}",
                errors.join("\n")
            );
        }
        let manifest: InputManifest = serde_json::from_value(value)?;
        if let Some(files) = &manifest.files {
            ensure_unique("files", files.entries.iter().map(|e| &e.symbolic_name))?;
        }
        if let Some(rdf) = &manifest.rdf {
            ensure_unique("rdf", rdf.entries.iter().map(|e| &e.symbolic_name))?;
        }
        Ok(manifest)
    }

    pub fn files_input(&self) -> Option<&dyn FilesInput> {
        self.files.as_ref().map(|section| section as &dyn FilesInput)
    }

    pub fn rdf_input(&self) -> Option<&dyn RdfInput> {
        self.rdf.as_ref().map(|section| section as &dyn RdfInput)
    }
}

fn ensure_unique<'a>(section: &str, names: impl Iterator<Item = &'a String>) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            bail!("duplicate symbolic name '{name}' in {section} section");
        }
    }
    Ok(())
}

impl FileSection {
    fn record(&self, symbolic_name: &str) -> Result<&FileRecord, InputError> {
        self.entries
            .iter()
            .find(|record| record.symbolic_name == symbolic_name)
            .ok_or_else(|| InputError::UnknownEntry(symbolic_name.to_string()))
    }
}

impl GraphSection {
    fn record(&self, symbolic_name: &str) -> Result<&GraphRecord, InputError> {
        self.entries
            .iter()
            .find(|record| record.symbolic_name == symbolic_name)
            .ok_or_else(|| InputError::UnknownEntry(symbolic_name.to_string()))
    }
}

impl ResourceMetadata for FileSection {
    fn resource(&self, symbolic_name: &str) -> Result<Resource, InputError> {
        Ok(self.record(symbolic_name)?.resource.clone().unwrap_or_default())
    }
}

impl FilesInput for FileSection {
    fn files(&self) -> Result<Vec<InputEntry>, InputError> {
        Ok(self
            .entries
            .iter()
            .map(|record| InputEntry::new(record.symbolic_name.clone()))
            .collect())
    }

    fn virtual_path(&self, symbolic_name: &str) -> Result<Option<String>, InputError> {
        Ok(self.record(symbolic_name)?.virtual_path.clone())
    }
}

impl ResourceMetadata for GraphSection {
    fn resource(&self, symbolic_name: &str) -> Result<Resource, InputError> {
        Ok(self.record(symbolic_name)?.resource.clone().unwrap_or_default())
    }
}

impl RdfInput for GraphSection {
    fn graphs(&self) -> Result<Vec<InputEntry>, InputError> {
        Ok(self
            .entries
            .iter()
            .map(|record| InputEntry::new(record.symbolic_name.clone()))
            .collect())
    }

    fn virtual_graph(&self, symbolic_name: &str) -> Result<Option<String>, InputError> {
        Ok(self.record(symbolic_name)?.virtual_graph.clone())
    }
}
