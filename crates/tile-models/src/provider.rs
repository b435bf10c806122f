//! The seam between models and the renderer that requests tiles.

use ogc_common::{BoundingBox, TileCoordinate};
use serde::{Deserialize, Serialize};

/// Produces the URL of each tile a renderer needs.
///
/// Implementations are immutable after construction and called once per
/// visible tile, so `tile_url` must be pure and cheap.
pub trait TileUrlProvider: Send + Sync {
    /// URL of `tile`, or `None` when the tile lies outside the pyramid.
    fn tile_url(&self, tile: &TileCoordinate) -> Option<String>;

    /// Canonical reference identifier, e.g. "EPSG:3857".
    fn reference(&self) -> &str;

    /// Extent in x/y order.
    fn bounds(&self) -> BoundingBox;

    /// Number of levels the renderer may request.
    fn level_count(&self) -> u32;

    /// (columns, rows) at level 0.
    fn level0_dimensions(&self) -> (u64, u64);

    /// (width, height) of one tile in pixels.
    fn tile_size(&self) -> (u32, u32);
}

/// Human-readable description of a model's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub source: String,
    pub name: String,
    pub description: String,
}

impl ModelDescriptor {
    pub fn new(
        source: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}
