//! Descriptive metadata attached to one published artifact.
//!
//! A [`Resource`] carries the builtin descriptive fields of a file or graph
//! plus free-form `extras`. On the wire both are flattened to string maps:
//! builtin fields sit directly on the resource object and extras are nested
//! under the `extras` key. Flattening is a one-to-one transcription; keys are
//! never renamed or filtered and values are only stringified.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key under which extras are nested in the flattened resource object.
pub const EXTRAS_KEY: &str = "extras";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
/// Metadata for a file or graph produced by the pipeline.
///
/// Well-known fields are typed; anything else (for example `title`) lands in
/// `properties` so manifests can carry arbitrary descriptive keys without a
/// schema change.
pub struct Resource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, String>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Attach a descriptive field such as `title`.
    ///
    /// Well-known keys are stored in their typed field so a key never exists
    /// twice. A `size` that is not an unsigned integer stays an open property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "size" {
            match value.parse::<u64>() {
                Ok(size) => {
                    self.size = Some(size);
                    self.properties.remove(&key);
                }
                Err(_) => {
                    self.size = None;
                    self.properties.insert(key, value);
                }
            }
        } else if let Some(slot) = self.typed_slot(&key) {
            *slot = Some(value);
        } else {
            self.properties.insert(key, value);
        }
        self
    }

    fn typed_slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            "format" => Some(&mut self.format),
            "mimetype" => Some(&mut self.mimetype),
            "created" => Some(&mut self.created),
            "last_modified" => Some(&mut self.last_modified),
            _ => None,
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Builtin and open fields as a flat string map.
    ///
    /// Unset typed fields are omitted. Properties set directly on `properties`
    /// under a typed key only fill that key when the typed field is unset.
    pub fn field_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let typed = [
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("format", self.format.clone()),
            ("mimetype", self.mimetype.clone()),
            ("size", self.size.map(|size| size.to_string())),
            ("created", self.created.clone()),
            ("last_modified", self.last_modified.clone()),
        ];
        for (key, value) in typed {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.properties {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        map
    }

    /// Extras as a flat string map.
    pub fn extras_map(&self) -> BTreeMap<String, String> {
        self.extras.clone()
    }

    /// Wire representation: flattened fields plus a nested `extras` object.
    pub fn flatten(&self) -> Map<String, Value> {
        let mut object: Map<String, Value> = self
            .field_map()
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        let extras: Map<String, Value> = self
            .extras_map()
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        object.insert(EXTRAS_KEY.to_string(), Value::Object(extras));
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_keeps_fields_and_nests_extras() {
        let resource = Resource {
            format: Some("text/plain".into()),
            ..Resource::default()
        }
        .with_property("title", "A")
        .with_extra("lang", "en");

        assert_eq!(
            Value::Object(resource.flatten()),
            json!({"title": "A", "format": "text/plain", "extras": {"lang": "en"}})
        );
    }

    #[test]
    fn empty_resource_still_carries_extras_object() {
        assert_eq!(
            Value::Object(Resource::new().flatten()),
            json!({"extras": {}})
        );
    }

    #[test]
    fn size_is_stringified_and_name_included_once_set() {
        let mut resource = Resource {
            size: Some(2048),
            ..Resource::default()
        };
        resource.set_name("out.csv");
        let fields = resource.field_map();
        assert_eq!(fields.get("size").map(String::as_str), Some("2048"));
        assert_eq!(fields.get("name").map(String::as_str), Some("out.csv"));
    }

    #[test]
    fn well_known_property_replaces_typed_field_without_loss() {
        let resource = Resource {
            format: Some("text/csv".into()),
            ..Resource::default()
        }
        .with_property("format", "application/x-custom")
        .with_property("size", "512");
        assert_eq!(resource.format.as_deref(), Some("application/x-custom"));
        assert_eq!(resource.size, Some(512));
        assert!(resource.properties.is_empty());
        assert_eq!(
            Value::Object(resource.flatten()),
            json!({"format": "application/x-custom", "size": "512", "extras": {}})
        );
    }

    #[test]
    fn non_numeric_size_stays_an_open_property() {
        let resource = Resource {
            size: Some(10),
            ..Resource::default()
        }
        .with_property("size", "about 2MB");
        assert_eq!(resource.size, None);
        assert_eq!(
            resource.field_map().get("size").map(String::as_str),
            Some("about 2MB")
        );
    }

    #[test]
    fn deserializes_open_properties_alongside_typed_fields() {
        let resource: Resource = serde_json::from_value(json!({
            "title": "Quarterly output",
            "mimetype": "text/csv",
            "size": 12,
            "extras": {"source": "etl"}
        }))
        .expect("resource parses");
        assert_eq!(resource.mimetype.as_deref(), Some("text/csv"));
        assert_eq!(resource.size, Some(12));
        assert_eq!(
            resource.properties.get("title").map(String::as_str),
            Some("Quarterly output")
        );
        assert_eq!(
            resource.extras.get("source").map(String::as_str),
            Some("etl")
        );
    }
}
