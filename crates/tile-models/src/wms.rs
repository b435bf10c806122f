//! WMS style tiling scheme.
//!
//! Cuts the extent of a reference into a quad-tree pyramid and produces a
//! WMS 1.3.0 `GetMap` request per tile. Used as the base of the OGC API
//! Maps model, which rewrites the request into OGC API parameters.

use ogc_common::{tiles_at_level, BoundingBox, Reference, TileCoordinate};

use crate::provider::TileUrlProvider;
use crate::query::QueryParams;

const DEFAULT_LEVEL_COUNT: u32 = 22;
const DEFAULT_TILE_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct WmsTileScheme {
    get_map_root: String,
    layers: Vec<String>,
    format: String,
    reference: String,
    bounds: BoundingBox,
    level0_columns: u64,
    level0_rows: u64,
    level_count: u32,
    tile_width: u32,
    tile_height: u32,
    transparent: bool,
}

impl WmsTileScheme {
    /// A pyramid over `reference`'s bounds, rooted at 1x1 or at 2x1 for
    /// geographic references.
    pub fn new(get_map_root: impl Into<String>, layers: Vec<String>, reference: &Reference) -> Self {
        let (level0_columns, level0_rows) = if reference.geographic { (2, 1) } else { (1, 1) };
        Self {
            get_map_root: get_map_root.into(),
            layers,
            format: "image/png".to_string(),
            reference: reference.identifier.clone(),
            bounds: reference.bounds,
            level0_columns,
            level0_rows,
            level_count: DEFAULT_LEVEL_COUNT,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            transparent: true,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_level_count(mut self, level_count: u32) -> Self {
        self.level_count = level_count;
        self
    }

    /// Extent of `tile`, rows counted from the bottom.
    pub fn tile_bbox(&self, tile: &TileCoordinate) -> Option<BoundingBox> {
        let columns = tiles_at_level(self.level0_columns, tile.level);
        let rows = tiles_at_level(self.level0_rows, tile.level);
        if tile.level >= self.level_count || tile.x >= columns || tile.y >= rows {
            return None;
        }

        let tile_span_x = self.bounds.width() / columns as f64;
        let tile_span_y = self.bounds.height() / rows as f64;

        let min_x = self.bounds.min_x + tile.x as f64 * tile_span_x;
        let min_y = self.bounds.min_y + tile.y as f64 * tile_span_y;

        Some(BoundingBox::new(
            min_x,
            min_y,
            min_x + tile_span_x,
            min_y + tile_span_y,
        ))
    }

    /// `GetMap` URL for `tile`.
    pub fn get_map_url(&self, tile: &TileCoordinate) -> Option<String> {
        let bbox = self.tile_bbox(tile)?;

        let mut params = QueryParams::new();
        params
            .push("SERVICE", "WMS")
            .push("REQUEST", "GetMap")
            .push("VERSION", "1.3.0")
            .push("LAYERS", self.layers.join(","))
            .push("STYLES", "")
            .push("FORMAT", self.format.clone())
            .push("TRANSPARENT", if self.transparent { "TRUE" } else { "FALSE" })
            .push("CRS", self.reference.clone())
            .push("BBOX", bbox.to_query_value())
            .push("WIDTH", self.tile_width.to_string())
            .push("HEIGHT", self.tile_height.to_string());

        Some(params.append_to(&self.get_map_root))
    }

    pub fn get_map_root(&self) -> &str {
        &self.get_map_root
    }
}

impl TileUrlProvider for WmsTileScheme {
    fn tile_url(&self, tile: &TileCoordinate) -> Option<String> {
        self.get_map_url(tile)
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
