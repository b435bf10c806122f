//! OGC API - Tiles model.
//!
//! Requests rows count from the bottom of the pyramid while most tile
//! matrix sets number them from the top, so rows are flipped whenever the
//! first matrix has its origin in the top-left corner.

use ogc_common::{
    tiles_at_level, BoundingBox, ConnectorResult, CornerOfOrigin, CrsRegistry, TileCoordinate,
};
use ogcapi_protocol::TileSetData;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::{ModelDescriptor, TileUrlProvider};
use crate::query::QueryParams;

const DEFAULT_TILE_SIZE: u32 = 256;

/// Model options as carried by a layer command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OgcTilesOptions {
    /// Tile URL template with `{tileMatrix}`, `{tileRow}` and `{tileCol}`.
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: String,

    pub collection: String,

    #[serde(rename = "tileMatrix", alias = "tileSet")]
    pub tile_set: TileSetData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgcolor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OgcTilesModel {
    options: OgcTilesOptions,
    reference: String,
    invert_y: bool,
    level0_columns: u64,
    level0_rows: u64,
    tile_width: u32,
    tile_height: u32,
    level_count: u32,
    bounds: BoundingBox,
}

impl OgcTilesModel {
    /// Build the model; fails with `UnknownCrs` when the tile matrix set's
    /// CRS is not in `registry`.
    pub fn new(options: OgcTilesOptions, registry: &CrsRegistry) -> ConnectorResult<Self> {
        let reference = registry.get_reference(&options.tile_set.crs)?;

        let (invert_y, level0_columns, level0_rows, tile_width, tile_height) =
            match options.tile_set.first_matrix() {
                Some(first) => (
                    first.corner() == CornerOfOrigin::TopLeft,
                    first.matrix_width,
                    first.matrix_height,
                    first.tile_width,
                    first.tile_height,
                ),
                None => (true, 1, 1, DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE),
            };

        let bounds = options
            .tile_set
            .bounds()
            .unwrap_or(reference.bounds);
        let level_count = options.tile_set.level_count() as u32;

        debug!(
            collection = %options.collection,
            tile_matrix_set = %options.tile_set.id,
            reference = %reference.identifier,
            invert_y = invert_y,
            level_count = level_count,
            "Created OGC API tiles model"
        );

        Ok(Self {
            reference: reference.identifier.clone(),
            options,
            invert_y,
            level0_columns,
            level0_rows,
            tile_width,
            tile_height,
            level_count,
            bounds,
        })
    }

    /// Fill `template` for `tile`.
    pub fn tile_url(&self, template: &str, tile: &TileCoordinate) -> String {
        let max_y = tiles_at_level(self.level0_rows, tile.level).saturating_sub(1);
        let row = if self.invert_y {
            max_y.saturating_sub(tile.y)
        } else {
            tile.y
        };
        let level = self.options.tile_set.level_label(tile.level);

        let url = template
            .replace("{tileMatrix}", &level)
            .replace("{tileRow}", &row.to_string())
            .replace("{tileCol}", &tile.x.to_string());

        self.query().append_to(&url)
    }

    fn query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(transparent) = self.options.transparent {
            params.push("transparent", transparent.to_string());
            if !transparent {
                params.push_opt("bgcolor", self.options.bgcolor.clone());
            }
        }
        params
    }

    pub fn options(&self) -> &OgcTilesOptions {
        &self.options
    }

    pub fn inverts_rows(&self) -> bool {
        self.invert_y
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::new(
            &self.options.base_url,
            &self.options.collection,
            "OGC API Tiles",
        )
    }
}

impl TileUrlProvider for OgcTilesModel {
    fn tile_url(&self, tile: &TileCoordinate) -> Option<String> {
        let columns = tiles_at_level(self.level0_columns, tile.level);
        let rows = tiles_at_level(self.level0_rows, tile.level);
        if tile.x >= columns || tile.y >= rows {
            return None;
        }
        Some(OgcTilesModel::tile_url(self, &self.options.base_url, tile))
    }

    fn reference(&self) -> &str {
        &self.reference
    }

    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn level_count(&self) -> u32 {
        self.level_count
    }

    fn level0_dimensions(&self) -> (u64, u64) {
        (self.level0_columns, self.level0_rows)
    }

    fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_common::ConnectorError;
    use test_utils::{fixtures, quad_pyramid, tile_matrix_set_json};

    const TEMPLATE: &str = "https://example.com/tiles/{tileMatrix}/{tileRow}/{tileCol}";

    fn options(tile_set: TileSetData) -> OgcTilesOptions {
        OgcTilesOptions {
            base_url: TEMPLATE.to_string(),
            collection: "blueMarble".to_string(),
            tile_set,
            transparent: None,
            bgcolor: None,
        }
    }

    fn generated(root: (u64, u64), first_id: u32, corner: &str) -> TileSetData {
        serde_json::from_value(tile_matrix_set_json(
            "Generated",
            "http://www.opengis.net/def/crs/EPSG/0/3857",
            &quad_pyramid(root, 4),
            first_id,
            corner,
        ))
        .unwrap()
    }

    #[test]
    fn test_top_left_rows_inverted() {
        // Two rows at level 0: max_y at level 1 is 2*2-1 = 3
        let model =
            OgcTilesModel::new(options(generated((1, 2), 0, "topLeft")), &CrsRegistry::default())
                .unwrap();
        assert!(model.inverts_rows());
        assert_eq!(
            model.tile_url(TEMPLATE, &TileCoordinate::new(1, 0, 1)),
            "https://example.com/tiles/1/2/0"
        );
    }

    #[test]
    fn test_bottom_left_rows_kept() {
        let model = OgcTilesModel::new(
            options(generated((1, 2), 0, "bottomLeft")),
            &CrsRegistry::default(),
        )
        .unwrap();
        assert!(!model.inverts_rows());
        assert_eq!(
            model.tile_url(TEMPLATE, &TileCoordinate::new(1, 0, 1)),
            "https://example.com/tiles/1/1/0"
        );
    }

    #[test]
    fn test_matrix_id_used_as_label() {
        let mut tile_set = generated((1, 1), 0, "topLeft");
        tile_set.tile_matrices[2].id = "02".to_string();
        let model = OgcTilesModel::new(options(tile_set), &CrsRegistry::default()).unwrap();

        assert_eq!(
            model.tile_url(TEMPLATE, &TileCoordinate::new(2, 1, 0)),
            "https://example.com/tiles/02/3/1"
        );
        // Beyond the listed matrices the level number itself is used
        assert_eq!(
            model.tile_url(TEMPLATE, &TileCoordinate::new(7, 0, 127)),
            "https://example.com/tiles/7/0/0"
        );
    }

    #[test]
    fn test_transparency_parameters() {
        let mut opts = options(generated((1, 1), 0, "topLeft"));
        opts.transparent = Some(false);
        opts.bgcolor = Some("0xFFFFFF".to_string());
        let model = OgcTilesModel::new(opts, &CrsRegistry::default()).unwrap();
        assert_eq!(
            model.tile_url(TEMPLATE, &TileCoordinate::new(0, 0, 0)),
            "https://example.com/tiles/0/0/0?transparent=false&bgcolor=0xFFFFFF"
        );
        assert_eq!(
            model.tile_url(
                "https://example.com/tiles/{tileMatrix}/{tileRow}/{tileCol}?f=png",
                &TileCoordinate::new(0, 0, 0)
            ),
            "https://example.com/tiles/0/0/0?f=png&transparent=false&bgcolor=0xFFFFFF"
        );
    }

    #[test]
    fn test_transparent_true_has_no_bgcolor() {
        let mut opts = options(generated((1, 1), 0, "topLeft"));
        opts.transparent = Some(true);
        opts.bgcolor = Some("0xFFFFFF".to_string());
        let model = OgcTilesModel::new(opts, &CrsRegistry::default()).unwrap();
        assert_eq!(
            model.tile_url(TEMPLATE, &TileCoordinate::new(0, 0, 0)),
            "https://example.com/tiles/0/0/0?transparent=true"
        );
    }

    #[test]
    fn test_unknown_crs_fails() {
        let mut tile_set = generated((1, 1), 0, "topLeft");
        tile_set.crs = "http://www.opengis.net/def/crs/IAU/2015/30100".to_string();
        let err = OgcTilesModel::new(options(tile_set), &CrsRegistry::default()).unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownCrs(_)));
    }

    #[test]
    fn test_bounds_from_tile_set_or_registry() {
        let set: TileSetData = serde_json::from_str(fixtures::WORLD_CRS84_QUAD).unwrap();
        let model = OgcTilesModel::new(options(set), &CrsRegistry::default()).unwrap();
        assert_eq!(model.reference(), "CRS:84");
        assert_eq!(model.bounds(), BoundingBox::new(-180.0, -90.0, 180.0, 90.0));
        assert_eq!(model.level0_dimensions(), (2, 1));
        assert_eq!(model.level_count(), 3);

        // No bounding box: the reference's bounds are used
        let model = OgcTilesModel::new(
            options(generated((1, 1), 0, "topLeft")),
            &CrsRegistry::default(),
        )
        .unwrap();
        assert_eq!(
            model.bounds(),
            CrsRegistry::default().get_reference("EPSG:3857").unwrap().bounds
        );
    }

    #[test]
    fn test_provider_rejects_tiles_outside_pyramid() {
        let model = OgcTilesModel::new(
            options(generated((1, 1), 0, "topLeft")),
            &CrsRegistry::default(),
        )
        .unwrap();
        let provider: &dyn TileUrlProvider = &model;
        assert!(provider.tile_url(&TileCoordinate::new(1, 2, 0)).is_none());
        assert_eq!(
            provider.tile_url(&TileCoordinate::new(1, 1, 0)).as_deref(),
            Some("https://example.com/tiles/1/1/1")
        );
    }
}
