//! OGC API - Features request model.
//!
//! Decoding the returned features is left to the caller; this model only
//! knows how to ask for them.

use std::collections::BTreeMap;

use ogc_common::{crs::CRS84, BoundingBox, ConnectorError, ConnectorResult, CrsRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::provider::ModelDescriptor;
use crate::query::QueryParams;

/// Model options as carried by a layer command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesOptions {
    /// Media type of the selected items link.
    pub output_format: String,

    /// CRS the features are requested in.
    #[serde(rename = "tmp_reference")]
    pub reference: String,

    /// Items endpoint used for single-feature requests.
    pub feature_url: String,

    /// Items endpoint used for bounding box queries.
    pub data_url: String,

    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,

    /// CRS sent as `crs` when the server should reproject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_crs: Option<String>,

    /// Query with CRS84 bounding boxes regardless of `reference`.
    #[serde(default)]
    pub use_crs84_bounds: bool,

    /// Features arrive latitude first.
    #[serde(default)]
    pub swap_axes: bool,
}

#[derive(Debug, Clone)]
pub struct FeaturesModel {
    options: FeaturesOptions,
    reference: String,
}

impl FeaturesModel {
    pub fn new(options: FeaturesOptions, registry: &CrsRegistry) -> ConnectorResult<Self> {
        if options.data_url.trim().is_empty() {
            return Err(ConnectorError::InvalidModelOptions(
                "Features model needs a dataUrl".to_string(),
            ));
        }
        let reference = registry.get_reference(&options.reference)?.identifier.clone();
        if let Some(custom) = &options.custom_crs {
            registry.get_reference(custom)?;
        }

        debug!(
            data_url = %options.data_url,
            reference = %reference,
            output_format = %options.output_format,
            "Created OGC API features model"
        );

        Ok(Self { options, reference })
    }

    /// URL of the items within `bbox`, at most `limit` of them.
    ///
    /// `bbox` is in CRS84 when `useCrs84Bounds` is set, otherwise in the
    /// model's reference, in which case `bbox-crs` is sent too.
    pub fn items_url(&self, bbox: Option<&BoundingBox>, limit: Option<u32>) -> String {
        let mut params = QueryParams::new();
        params.push_opt("limit", limit.map(|l| l.to_string()));

        if let Some(bbox) = bbox {
            if self.options.use_crs84_bounds || self.reference == CRS84 {
                params.push("bbox", bbox.to_query_value());
            } else {
                let bbox = if self.options.swap_axes {
                    bbox.swap_axes()
                } else {
                    *bbox
                };
                params
                    .push("bbox", bbox.to_query_value())
                    .push("bbox-crs", self.options.reference.clone());
            }
        }
        params.push_opt("crs", self.options.custom_crs.clone());

        params.append_to(&self.options.data_url)
    }

    /// URL of the single feature `id`, keeping the endpoint's query.
    ///
    /// The id is percent-encoded as one path segment.
    pub fn feature_url(&self, id: &str) -> ConnectorResult<String> {
        let invalid = |reason: String| {
            ConnectorError::InvalidModelOptions(format!(
                "featureUrl '{}' {}",
                self.options.feature_url, reason
            ))
        };
        let mut url = Url::parse(&self.options.feature_url)
            .map_err(|e| invalid(format!("is not a URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot take a feature id".to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url.into())
    }

    /// Reference the codec must swap axes for, if any.
    pub fn axis_swapped_reference(&self) -> Option<&str> {
        self.options.swap_axes.then_some(self.reference.as_str())
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn request_headers(&self) -> &BTreeMap<String, String> {
        &self.options.request_headers
    }

    pub fn options(&self) -> &FeaturesOptions {
        &self.options
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::new(
            &self.options.data_url,
            &self.reference,
            "OGC API Features",
        )
    }
}
