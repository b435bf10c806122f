//! Connector configuration.

use std::path::Path;
use std::time::Duration;

use ogc_common::crs::DEFAULT_REVERSED_AXIS_CRS;
use ogc_common::{AxisOrderPolicy, BoundingBox, ConnectorError, ConnectorResult, CrsRegistry};
use ogcapi_protocol::media_types;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Connector settings, loaded from YAML.
///
/// Every field has a default so partial files are valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectorConfig {
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Media type preferred for map and tile images
    pub preferred_image_format: String,

    /// Media type preferred for feature items
    pub preferred_feature_format: String,

    /// CRSs whose bounding boxes are sent latitude first
    pub reversed_axis_crs: Vec<String>,

    /// Non-standard CRSs to register before any model is built
    pub crs_definitions: Vec<CrsDefinition>,
}

/// A CRS registered from its well-known text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrsDefinition {
    pub id: String,
    pub wkt: String,

    /// Bounds as [min_x, min_y, max_x, max_y]; required for projected CRSs
    /// whose WKT carries no usable BBOX.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: concat!("ogcapi-connect/", env!("CARGO_PKG_VERSION")).to_string(),
            preferred_image_format: media_types::PNG.to_string(),
            preferred_feature_format: media_types::GEO_JSON.to_string(),
            reversed_axis_crs: DEFAULT_REVERSED_AXIS_CRS
                .iter()
                .map(|id| id.to_string())
                .collect(),
            crs_definitions: Vec::new(),
        }
    }
}

impl ConnectorConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> ConnectorResult<Self> {
        let config: ConnectorConfig = serde_yaml::from_str(content)
            .map_err(|e| ConnectorError::Config(format!("Invalid connector config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> ConnectorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConnectorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)?;
        info!(
            path = %path.display(),
            crs_definitions = config.crs_definitions.len(),
            "Loaded connector config"
        );
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConnectorResult<Self> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                warn!(
                    "Connector config {} does not exist, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConnectorError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.preferred_image_format.trim().is_empty() {
            return Err(ConnectorError::Config(
                "preferred_image_format must not be empty".to_string(),
            ));
        }
        if self.preferred_feature_format.trim().is_empty() {
            return Err(ConnectorError::Config(
                "preferred_feature_format must not be empty".to_string(),
            ));
        }
        for definition in &self.crs_definitions {
            if definition.id.trim().is_empty() || definition.wkt.trim().is_empty() {
                return Err(ConnectorError::Config(
                    "crs_definitions entries need both id and wkt".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Well-known CRSs plus every configured definition.
    pub fn crs_registry(&self) -> ConnectorResult<CrsRegistry> {
        let mut registry = CrsRegistry::with_defaults();
        for definition in &self.crs_definitions {
            let bounds = definition
                .bounds
                .map(|[min_x, min_y, max_x, max_y]| BoundingBox::new(min_x, min_y, max_x, max_y));
            registry.register_wkt(&definition.id, &definition.wkt, bounds)?;
        }
        Ok(registry)
    }

    pub fn axis_policy(&self) -> AxisOrderPolicy {
        AxisOrderPolicy::new(&self.reversed_axis_crs)
    }
}
