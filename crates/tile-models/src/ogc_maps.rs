//! OGC API - Maps model.
//!
//! Tiles are laid out by a [`WmsTileScheme`]; each of its `GetMap` requests
//! is rewritten into an OGC API Maps request for the same extent.

use ogc_common::{AxisOrderPolicy, BoundingBox, ConnectorResult, CrsRegistry, TileCoordinate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::{ModelDescriptor, TileUrlProvider};
use crate::query::{query_value, strip_query, QueryParams};
use crate::wms::WmsTileScheme;

/// Model options as carried by a layer command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OgcMapsOptions {
    /// CRS identifier or URI, sent verbatim as `crs` and `bbox-crs`.
    pub crs: String,

    /// Map endpoint of the collection.
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: String,

    pub collection: String,

    /// Output format, sent as `f`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Force latitude-first bounding boxes.
    #[serde(default, rename = "reverseAxis")]
    pub reverse_axis: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset: Option<Vec<String>>,

    /// Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgcolor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OgcMapsModel {
    scheme: WmsTileScheme,
    options: OgcMapsOptions,
    transparent: bool,
    swap_axes: bool,
}

impl OgcMapsModel {
    /// Build the model; fails with `UnknownCrs` when `options.crs` is not in
    /// `registry`.
    pub fn new(
        options: OgcMapsOptions,
        registry: &CrsRegistry,
        axis_policy: &AxisOrderPolicy,
    ) -> ConnectorResult<Self> {
        let reference = registry.get_reference(&options.crs)?;
        let transparent = options.transparent.unwrap_or(true);
        let swap_axes =
            options.reverse_axis || axis_policy.is_reversed_axis_order(&reference.identifier);

        let mut scheme = WmsTileScheme::new(
            options.base_url.clone(),
            vec![options.collection.clone()],
            reference,
        )
        .with_transparent(transparent);
        if let Some(format) = &options.format {
            scheme = scheme.with_format(format.clone());
        }

        debug!(
            collection = %options.collection,
            reference = %reference.identifier,
            swap_axes = swap_axes,
            "Created OGC API maps model"
        );

        Ok(Self {
            scheme,
            options,
            transparent,
            swap_axes,
        })
    }

    /// Rewrite a `GetMap` URL into an OGC API Maps request.
    ///
    /// URLs without a `BBOX` parameter are returned unchanged.
    pub fn rewrite_url(&self, get_map_url: &str) -> String {
        let Some(bbox) = query_value(get_map_url, "BBOX") else {
            return get_map_url.to_string();
        };
        let bbox = bbox.replace("%2C", ",").replace("%2c", ",");
        let bbox = if self.swap_axes {
            swap_ordinates(&bbox)
        } else {
            bbox
        };

        let mut params = QueryParams::new();
        params
            .push("bbox", bbox)
            .push("crs", self.options.crs.clone())
            .push("bbox-crs", self.options.crs.clone())
            .push_opt("f", self.options.format.clone())
            .push_opt("datetime", self.options.datetime.clone())
            .push_opt("subset", self.options.subset.as_ref().map(|s| s.join(",")))
            .push("transparent", self.transparent.to_string());
        if !self.transparent {
            params.push_opt("bgcolor", self.options.bgcolor.clone());
        }

        format!("{}?{}", strip_query(get_map_url), params.to_query_string())
    }

    pub fn options(&self) -> &OgcMapsOptions {
        &self.options
    }

    pub fn swaps_axes(&self) -> bool {
        self.swap_axes
    }

    pub fn scheme(&self) -> &WmsTileScheme {
        &self.scheme
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::new(
            &self.options.base_url,
            &self.options.collection,
            "OGC API Maps",
        )
    }
}

/// `a,b,c,d` → `b,a,d,c`. Values that are not four ordinates are returned
/// unchanged.
fn swap_ordinates(bbox: &str) -> String {
    let parts: Vec<&str> = bbox.split(',').collect();
    match parts.as_slice() {
        [a, b, c, d] => format!("{},{},{},{}", b, a, d, c),
        _ => bbox.to_string(),
    }
}

impl TileUrlProvider for OgcMapsModel {
    fn tile_url(&self, tile: &TileCoordinate) -> Option<String> {
        self.scheme
            .get_map_url(tile)
            .map(|url| self.rewrite_url(&url))
    }

    fn reference(&self) -> &str {
        self.scheme.reference()
    }

    fn bounds(&self) -> BoundingBox {
        self.scheme.bounds()
    }

    fn level_count(&self) -> u32 {
        self.scheme.level_count()
    }

    fn level0_dimensions(&self) -> (u64, u64) {
        self.scheme.level0_dimensions()
    }

    fn tile_size(&self) -> (u32, u32) {
        self.scheme.tile_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_common::ConnectorError;

    fn options(crs: &str) -> OgcMapsOptions {
        OgcMapsOptions {
            crs: crs.to_string(),
            base_url: "https://example.com/collections/dem/map".to_string(),
            collection: "dem".to_string(),
            ..Default::default()
        }
    }

    fn model(options: OgcMapsOptions) -> OgcMapsModel {
        OgcMapsModel::new(options, &CrsRegistry::default(), &AxisOrderPolicy::default()).unwrap()
    }

    const GET_MAP: &str =
        "https://example.com/collections/dem/map?SERVICE=WMS&REQUEST=GetMap&BBOX=1,2,3,4&WIDTH=256";

    #[test]
    fn test_bbox_and_crs_parameters() {
        let url = model(options("EPSG:3857")).rewrite_url(GET_MAP);
        assert!(url.contains("bbox=1,2,3,4&crs=EPSG:3857&bbox-crs=EPSG:3857"));
        assert_eq!(
            url,
            "https://example.com/collections/dem/map?bbox=1,2,3,4&crs=EPSG:3857&bbox-crs=EPSG:3857&transparent=true"
        );
    }

    #[test]
    fn test_optional_parameters() {
        let mut opts = options("EPSG:3857");
        opts.format = Some("image/png".to_string());
        opts.datetime = Some("2018-02-12T23:20:50Z".to_string());
        opts.subset = Some(vec!["sub1".to_string(), "sub2".to_string()]);
        opts.transparent = Some(false);
        opts.bgcolor = Some("0x000000".to_string());

        assert_eq!(
            model(opts).rewrite_url(GET_MAP),
            "https://example.com/collections/dem/map?bbox=1,2,3,4&crs=EPSG:3857&bbox-crs=EPSG:3857&f=image/png&datetime=2018-02-12T23:20:50Z&subset=sub1,sub2&transparent=false&bgcolor=0x000000"
        );
    }

    #[test]
    fn test_bgcolor_dropped_when_transparent() {
        let mut opts = options("EPSG:3857");
        opts.bgcolor = Some("0x000000".to_string());
        assert!(!model(opts).rewrite_url(GET_MAP).contains("bgcolor"));
    }

    #[test]
    fn test_allow_listed_crs_swaps_ordinates() {
        let maps = model(options("http://www.opengis.net/def/crs/EPSG/0/4269"));
        assert!(maps.swaps_axes());
        assert!(maps.rewrite_url(GET_MAP).contains("bbox=2,1,4,3&"));
    }

    #[test]
    fn test_reverse_axis_flag_swaps_ordinates() {
        let mut opts = options("EPSG:4326");
        assert!(!model(opts.clone()).swaps_axes());
        opts.reverse_axis = true;
        assert!(model(opts).rewrite_url(GET_MAP).contains("bbox=2,1,4,3&"));
    }

    #[test]
    fn test_url_without_bbox_unchanged() {
        let url = "https://example.com/collections/dem/map?SERVICE=WMS&WIDTH=256";
        assert_eq!(model(options("EPSG:3857")).rewrite_url(url), url);
    }

    #[test]
    fn test_unknown_crs_fails() {
        let err = OgcMapsModel::new(
            options("EPSG:999999"),
            &CrsRegistry::default(),
            &AxisOrderPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownCrs(_)));
    }

    #[test]
    fn test_tile_url_through_scheme() {
        let maps = model(options("CRS:84"));
        let url = maps.tile_url(&TileCoordinate::new(0, 0, 0)).unwrap();
        assert_eq!(
            url,
            "https://example.com/collections/dem/map?bbox=-180,-90,0,90&crs=CRS:84&bbox-crs=CRS:84&transparent=true"
        );
        assert!(maps.tile_url(&TileCoordinate::new(0, 2, 0)).is_none());
    }

    #[test]
    fn test_options_from_command_json() {
        let opts: OgcMapsOptions = serde_json::from_str(
            r#"{
                "baseURL": "https://example.com/collections/dem/map",
                "collection": "dem",
                "crs": "EPSG:3857",
                "subset": ["sub1", "sub2"],
                "datetime": "2018-02-12T23:20:50Z"
            }"#,
        )
        .unwrap();
        assert_eq!(opts.subset.as_ref().map(Vec::len), Some(2));
        assert!(!opts.reverse_axis);
        assert!(opts.transparent.is_none());
    }
}
