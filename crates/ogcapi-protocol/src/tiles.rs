//! OGC API - Tiles documents: tile matrix sets and tilesets.
//!
//! Both the 2.0 encoding (`id`, `crs`, `tileMatrices`, `pointOfOrigin`) and
//! the 1.0 encoding (`identifier`, `supportedCRS`, `tileMatrix`,
//! `topLeftCorner`) deserialize into the same types.

use ogc_common::{BoundingBox, CornerOfOrigin};
use serde::{Deserialize, Deserializer, Serialize};

use crate::relations;
use crate::types::{CrsValue, Link};

/// Listing of the tile matrix sets a service knows (`/tileMatrixSets`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrixSetList {
    #[serde(default)]
    pub tile_matrix_sets: Vec<TileMatrixSetItem>,
}

/// A lightweight tile matrix set listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileMatrixSetItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsValue>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl TileMatrixSetItem {
    /// The identifier, taken from the URI's last path segment when the
    /// entry has no explicit id.
    pub fn identifier(&self) -> Option<String> {
        self.id
            .clone()
            .or_else(|| self.uri.as_deref().map(|uri| last_segment(uri).to_string()))
    }

    /// The link to the full definition, preferring JSON encodings.
    pub fn definition_link(&self) -> Option<&Link> {
        let candidates: Vec<&Link> = self
            .links
            .iter()
            .filter(|l| l.has_rel(relations::SELF) || l.has_rel(relations::TILING_SCHEME))
            .collect();
        candidates
            .iter()
            .find(|l| l.media_type().contains("json"))
            .or_else(|| candidates.first())
            .copied()
    }
}

/// A full tile matrix set definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileSetData {
    #[serde(alias = "identifier")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// CRS URI of the tile matrix set.
    #[serde(alias = "supportedCRS", deserialize_with = "crs_uri")]
    pub crs: String,

    /// Axis names in the order coordinates are given, e.g. ["Lon", "Lat"].
    #[serde(default = "default_ordered_axes")]
    pub ordered_axes: Vec<String>,

    #[serde(alias = "tileMatrix")]
    pub tile_matrices: Vec<TileMatrixLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<TileSetBoundingBox>,
}

fn default_ordered_axes() -> Vec<String> {
    vec!["X".to_string(), "Y".to_string()]
}

fn crs_uri<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = CrsValue::deserialize(deserializer)?;
    value
        .uri()
        .map(str::to_string)
        .ok_or_else(|| serde::de::Error::custom("tile matrix set CRS has no URI"))
}

impl TileSetData {
    /// The first (coarsest) tile matrix.
    pub fn first_matrix(&self) -> Option<&TileMatrixLevel> {
        self.tile_matrices.first()
    }

    /// (matrix_width, matrix_height) per level, coarsest first.
    pub fn level_dimensions(&self) -> Vec<(u64, u64)> {
        self.tile_matrices
            .iter()
            .map(|m| (m.matrix_width, m.matrix_height))
            .collect()
    }

    /// Number of levels whose id is a non-negative number.
    pub fn level_count(&self) -> usize {
        self.tile_matrices
            .iter()
            .filter(|m| m.numeric_id().map(|n| n > -1.0).unwrap_or(false))
            .count()
    }

    /// Find the matrix whose id numerically equals `level`.
    pub fn matrix_for_level(&self, level: u32) -> Option<&TileMatrixLevel> {
        self.tile_matrices.iter().find(|m| m.matches_level(level))
    }

    /// Label to put in a tile request for `level`: the matching matrix id,
    /// or the level number itself when no matrix matches.
    pub fn level_label(&self, level: u32) -> String {
        self.matrix_for_level(level)
            .map(|m| m.id.clone())
            .unwrap_or_else(|| level.to_string())
    }

    /// True when coordinates are given northing/latitude first.
    pub fn latitude_first(&self) -> bool {
        self.ordered_axes
            .first()
            .map(|axis| {
                matches!(
                    axis.trim().to_ascii_uppercase().as_str(),
                    "LAT" | "LATITUDE" | "N" | "S"
                )
            })
            .unwrap_or(false)
    }

    /// Bounding box in x/y order, honouring `ordered_axes`.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounding_box.as_ref().map(|bbox| {
            let bounds = BoundingBox::from_corners(bbox.lower_left, bbox.upper_right);
            if self.latitude_first() {
                bounds.swap_axes()
            } else {
                bounds
            }
        })
    }
}

/// One level of a tile matrix set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrixLevel {
    #[serde(alias = "identifier", deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_denominator: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_of_origin: Option<CornerOfOrigin>,

    #[serde(default, alias = "topLeftCorner", skip_serializing_if = "Option::is_none")]
    pub point_of_origin: Option<[f64; 2]>,

    pub tile_width: u32,
    pub tile_height: u32,
    pub matrix_width: u64,
    pub matrix_height: u64,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

impl TileMatrixLevel {
    /// The id read as a number ("03" → 3).
    pub fn numeric_id(&self) -> Option<f64> {
        self.id.trim().parse::<f64>().ok()
    }

    pub fn matches_level(&self, level: u32) -> bool {
        self.numeric_id() == Some(f64::from(level))
    }

    /// Corner of origin, top-left when the server leaves it out.
    pub fn corner(&self) -> CornerOfOrigin {
        self.corner_of_origin.unwrap_or_default()
    }
}

/// Bounding box of a tile matrix set, corners in `ordered_axes` order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileSetBoundingBox {
    #[serde(alias = "lowerCorner")]
    pub lower_left: [f64; 2],

    #[serde(alias = "upperCorner")]
    pub upper_right: [f64; 2],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsValue>,
}

/// The tilesets of one collection (`/collections/{id}/map/tiles`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TilesetList {
    #[serde(default)]
    pub tilesets: Vec<TilesetItem>,

    #[serde(default)]
    pub links: Vec<Link>,
}

/// A tileset listing entry or tileset document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TilesetItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_matrix_set_id: Option<String>,

    #[serde(
        default,
        rename = "tileMatrixSetURI",
        alias = "tileMatrixSetUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub tile_matrix_set_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsValue>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl TilesetItem {
    /// Whether this tileset is tiled according to tile matrix set `id`.
    pub fn references_tile_matrix_set(&self, id: &str) -> bool {
        if self.tile_matrix_set_id.as_deref() == Some(id) {
            return true;
        }
        if self.tile_matrix_set_uri.as_deref().map(last_segment) == Some(id) {
            return true;
        }
        self.self_link()
            .map(|link| path_of(&link.href).trim_end_matches('/').ends_with(&format!("/{}", id)))
            .unwrap_or(false)
    }

    /// Templated tile links (`rel="item"`).
    pub fn tile_links(&self) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| l.has_rel(relations::ITEM))
            .collect()
    }

    pub fn self_link(&self) -> Option<&Link> {
        self.links.iter().find(|l| l.has_rel(relations::SELF))
    }
}

fn last_segment(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}

fn path_of(href: &str) -> &str {
    href.split(['?', '#']).next().unwrap_or(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: &str, width: u64, height: u64) -> TileMatrixLevel {
        TileMatrixLevel {
            id: id.to_string(),
            scale_denominator: None,
            cell_size: None,
            corner_of_origin: None,
            point_of_origin: None,
            tile_width: 256,
            tile_height: 256,
            matrix_width: width,
            matrix_height: height,
        }
    }

    fn tile_set(levels: Vec<TileMatrixLevel>) -> TileSetData {
        TileSetData {
            id: "Test".to_string(),
            title: None,
            uri: None,
            crs: "http://www.opengis.net/def/crs/EPSG/0/3857".to_string(),
            ordered_axes: default_ordered_axes(),
            tile_matrices: levels,
            bounding_box: None,
        }
    }

    #[test]
    fn test_level_label_matches_numerically() {
        let set = tile_set(vec![level("00", 1, 1), level("01", 2, 2), level("x", 4, 4)]);
        assert_eq!(set.level_label(1), "01");
        assert_eq!(set.level_label(0), "00");
        // No matching id: the raw level is used
        assert_eq!(set.level_label(7), "7");
        assert_eq!(set.level_count(), 2);
    }

    #[test]
    fn test_numeric_ids_deserialize() {
        let matrix: TileMatrixLevel = serde_json::from_str(
            r#"{"identifier": 3, "tileWidth": 256, "tileHeight": 256, "matrixWidth": 8, "matrixHeight": 8, "topLeftCorner": [-180.0, 90.0]}"#,
        )
        .unwrap();
        assert_eq!(matrix.id, "3");
        assert_eq!(matrix.point_of_origin, Some([-180.0, 90.0]));
        assert_eq!(matrix.corner(), CornerOfOrigin::TopLeft);
    }

    #[test]
    fn test_latitude_first_bounds() {
        let mut set = tile_set(vec![level("0", 2, 1)]);
        set.ordered_axes = vec!["Lat".to_string(), "Lon".to_string()];
        set.bounding_box = Some(TileSetBoundingBox {
            lower_left: [-90.0, -180.0],
            upper_right: [90.0, 180.0],
            crs: None,
        });
        assert!(set.latitude_first());
        assert_eq!(set.bounds(), Some(BoundingBox::new(-180.0, -90.0, 180.0, 90.0)));
    }

    #[test]
    fn test_tileset_references_by_uri_and_self_link() {
        let by_uri: TilesetItem = serde_json::from_str(
            r#"{"tileMatrixSetURI": "http://www.opengis.net/def/tilematrixset/OGC/1.0/WebMercatorQuad", "links": []}"#,
        )
        .unwrap();
        assert!(by_uri.references_tile_matrix_set("WebMercatorQuad"));
        assert!(!by_uri.references_tile_matrix_set("WorldCRS84Quad"));

        let by_link: TilesetItem = serde_json::from_str(
            r#"{"links": [{"href": "https://example.com/collections/dem/map/tiles/WorldCRS84Quad?f=json", "rel": "self"}]}"#,
        )
        .unwrap();
        assert!(by_link.references_tile_matrix_set("WorldCRS84Quad"));
    }
}
