//! Embedded JSON Schemas for the input manifest and the outgoing document.
//!
//! Both schemas ship inside the binary so a publish run never depends on the
//! working directory. Validation collects every violation rather than
//! stopping at the first so operators can fix a manifest in one pass.

use jsonschema::JSONSchema;
use serde_json::Value;

const CATALOG_DOCUMENT_SCHEMA: &str = include_str!("../schema/catalog_document.schema.json");
const INPUT_MANIFEST_SCHEMA: &str = include_str!("../schema/input_manifest.schema.json");

/// Which embedded schema to validate against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddedSchema {
    CatalogDocument,
    InputManifest,
}

impl EmbeddedSchema {
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddedSchema::CatalogDocument => "catalog_document.schema.json",
            EmbeddedSchema::InputManifest => "input_manifest.schema.json",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            EmbeddedSchema::CatalogDocument => CATALOG_DOCUMENT_SCHEMA,
            EmbeddedSchema::InputManifest => INPUT_MANIFEST_SCHEMA,
        }
    }

    /// Validate `instance`, returning one message per violation.
    ///
    /// A schema that fails to parse or compile is reported as a single
    /// violation naming the schema.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        let schema = self.compile().map_err(|err| vec![err])?;
        if let Err(errors) = schema.validate(instance) {
            let details = errors
                .map(|err| format!("{}: {}", err.instance_path, err))
                .collect::<Vec<_>>();
            return Err(details);
        }
        Ok(())
    }

    fn compile(&self) -> Result<JSONSchema, String> {
        let raw: Value = serde_json::from_str(self.source())
            .map_err(|err| format!("parsing {}: {err}", self.name()))?;
        JSONSchema::compile(&raw).map_err(|err| format!("compiling {}: {err}", self.name()))
    }
}
