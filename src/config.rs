//! Publisher configuration.
//!
//! Values are layered: an optional JSON file first, then the
//! `CATALOG_API_LOCATION` / `CATALOG_PIPELINE_ID` environment variables, then
//! whatever the CLI passes explicitly. Only the catalog location is required.

use crate::document::PipelineId;
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_CATALOG_API_LOCATION: &str = "CATALOG_API_LOCATION";
pub const ENV_PIPELINE_ID: &str = "CATALOG_PIPELINE_ID";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Effective settings for one publish run.
pub struct PublisherConfig {
    pub catalog_api_location: String,
    pub pipeline_id: PipelineId,
    /// Escalate a non-200 reply to an error instead of only logging it.
    pub fail_on_rejection: bool,
    pub timeout: Option<Duration>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Partially specified configuration, as read from a file or flags.
pub struct ConfigLayer {
    #[serde(default)]
    pub catalog_api_location: Option<String>,
    #[serde(default)]
    pub pipeline_id: Option<PipelineId>,
    #[serde(default)]
    pub fail_on_rejection: Option<bool>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Layer built from `CATALOG_API_LOCATION` and `CATALOG_PIPELINE_ID`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());
        Self {
            catalog_api_location: non_empty(ENV_CATALOG_API_LOCATION),
            pipeline_id: non_empty(ENV_PIPELINE_ID).map(|raw| PipelineId::parse(&raw)),
            fail_on_rejection: None,
            timeout_secs: None,
        }
    }

    /// Values in `other` win over values already present.
    pub fn merge(self, other: ConfigLayer) -> Self {
        Self {
            catalog_api_location: other.catalog_api_location.or(self.catalog_api_location),
            pipeline_id: other.pipeline_id.or(self.pipeline_id),
            fail_on_rejection: other.fail_on_rejection.or(self.fail_on_rejection),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    pub fn build(self) -> Result<PublisherConfig> {
        let catalog_api_location = self
            .catalog_api_location
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "catalog API location is not configured (set catalogApiLocation, {ENV_CATALOG_API_LOCATION}, or --catalog-api-location)"
                )
            })?;
        let pipeline_id = match self.pipeline_id {
            Some(PipelineId::Text(text)) => PipelineId::parse(&text),
            Some(id) => id,
            None => bail!("pipeline id is not configured"),
        };
        if let PipelineId::Text(text) = &pipeline_id {
            if text.is_empty() {
                bail!("pipeline id must not be empty");
            }
        }
        if self.timeout_secs == Some(0) {
            bail!("timeoutSecs must be greater than zero");
        }
        Ok(PublisherConfig {
            catalog_api_location,
            pipeline_id,
            fail_on_rejection: self.fail_on_rejection.unwrap_or(false),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

impl fmt::Display for PublisherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "catalogApiLocation={} pipelineId={} failOnRejection={}",
            self.catalog_api_location, self.pipeline_id, self.fail_on_rejection
        )?;
        if let Some(timeout) = self.timeout {
            write!(f, " timeoutSecs={}", timeout.as_secs())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn later_layers_override_earlier_ones() {
        let file = ConfigLayer {
            catalog_api_location: Some("http://file.example/api".into()),
            pipeline_id: Some(PipelineId::Number(1)),
            fail_on_rejection: Some(true),
            timeout_secs: None,
        };
        let cli = ConfigLayer {
            catalog_api_location: Some("http://cli.example/api".into()),
            timeout_secs: Some(5),
            ..ConfigLayer::default()
        };
        let config = file.merge(cli).build().expect("config builds");
        assert_eq!(config.catalog_api_location, "http://cli.example/api");
        assert_eq!(config.pipeline_id, PipelineId::Number(1));
        assert!(config.fail_on_rejection);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_location_is_an_error() {
        let err = ConfigLayer {
            pipeline_id: Some(PipelineId::Number(1)),
            ..ConfigLayer::default()
        }
        .build()
        .unwrap_err();
        assert!(err.to_string().contains("catalog API location"));
    }

    #[test]
    fn rejection_policy_defaults_to_lenient() {
        let config = ConfigLayer {
            catalog_api_location: Some("http://catalog.example".into()),
            pipeline_id: Some(PipelineId::Number(3)),
            ..ConfigLayer::default()
        }
        .build()
        .unwrap();
        assert!(!config.fail_on_rejection);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn env_layer_ignores_blank_values() {
        let vars: BTreeMap<&str, &str> = BTreeMap::from([
            (ENV_CATALOG_API_LOCATION, "  "),
            (ENV_PIPELINE_ID, "42"),
        ]);
        let layer = ConfigLayer::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(layer.catalog_api_location, None);
        assert_eq!(layer.pipeline_id, Some(PipelineId::Number(42)));
    }

    #[test]
    fn file_layer_uses_camel_case_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"catalogApiLocation": "https://catalog.example/api/v2/resources", "pipelineId": 42, "failOnRejection": true}}"#
        )
        .unwrap();
        let layer = ConfigLayer::from_file(file.path()).expect("config file parses");
        assert_eq!(
            layer.catalog_api_location.as_deref(),
            Some("https://catalog.example/api/v2/resources")
        );
        assert_eq!(layer.pipeline_id, Some(PipelineId::Number(42)));
        assert_eq!(layer.fail_on_rejection, Some(true));

        let mut unknown = NamedTempFile::new().unwrap();
        write!(unknown, r#"{{"catalogUrl": "x"}}"#).unwrap();
        assert!(ConfigLayer::from_file(unknown.path()).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ConfigLayer {
            catalog_api_location: Some("http://catalog.example".into()),
            pipeline_id: Some(PipelineId::Number(1)),
            timeout_secs: Some(0),
            ..ConfigLayer::default()
        }
        .build()
        .unwrap_err();
        assert!(err.to_string().contains("timeoutSecs"));
    }

    #[test]
    fn numeric_text_pipeline_id_from_file_becomes_a_number() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"catalogApiLocation": "http://catalog.example", "pipelineId": "42"}}"#
        )
        .unwrap();
        let config = ConfigLayer::from_file(file.path())
            .and_then(ConfigLayer::build)
            .expect("config builds");
        assert_eq!(config.pipeline_id, PipelineId::Number(42));

        let named = ConfigLayer {
            catalog_api_location: Some("http://catalog.example".into()),
            pipeline_id: Some(PipelineId::Text("nightly".into())),
            ..ConfigLayer::default()
        }
        .build()
        .unwrap();
        assert_eq!(named.pipeline_id, PipelineId::Text("nightly".into()));
    }

    #[test]
    fn display_lists_effective_settings() {
        let config = PublisherConfig {
            catalog_api_location: "http://catalog.example".into(),
            pipeline_id: PipelineId::Number(9),
            fail_on_rejection: false,
            timeout: Some(Duration::from_secs(30)),
        };
        assert_eq!(
            config.to_string(),
            "catalogApiLocation=http://catalog.example pipelineId=9 failOnRejection=false timeoutSecs=30"
        );
    }
}
