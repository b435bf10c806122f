//! TMS / XYZ tiles from a URL template over Web Mercator.
//!
//! Supported placeholders: `{s}` (subdomain), `{z}` (level), `{x}` (column),
//! `{y}` (row counted from the bottom) and `{-y}` (row counted from the top).

use ogc_common::{
    tiles_at_level, BoundingBox, ConnectorError, ConnectorResult, CrsRegistry, TileCoordinate,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::{ModelDescriptor, TileUrlProvider};

const WEB_MERCATOR: &str = "EPSG:3857";
const DEFAULT_LEVEL_COUNT: u32 = 22;
const TILE_SIZE: u32 = 256;

fn default_level_count() -> u32 {
    DEFAULT_LEVEL_COUNT
}

/// Model options as carried by a layer command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlTemplateOptions {
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: String,

    #[serde(default)]
    pub subdomains: Vec<String>,

    #[serde(rename = "levelCount", default = "default_level_count")]
    pub level_count: u32,
}

#[derive(Debug, Clone)]
pub struct UrlTemplateModel {
    options: UrlTemplateOptions,
    bounds: BoundingBox,
}

impl UrlTemplateModel {
    pub fn new(options: UrlTemplateOptions, registry: &CrsRegistry) -> ConnectorResult<Self> {
        if options.base_url.trim().is_empty() {
            return Err(ConnectorError::InvalidModelOptions(
                "TMS model needs a baseURL".to_string(),
            ));
        }
        if options.base_url.contains("{s}") && options.subdomains.is_empty() {
            return Err(ConnectorError::InvalidModelOptions(format!(
                "Template {} uses {{s}} but no subdomains are configured",
                options.base_url
            )));
        }
        if options.level_count == 0 {
            return Err(ConnectorError::InvalidModelOptions(
                "levelCount must be at least 1".to_string(),
            ));
        }

        let bounds = registry.get_reference(WEB_MERCATOR)?.bounds;

        debug!(
            template = %options.base_url,
            subdomains = options.subdomains.len(),
            level_count = options.level_count,
            "Created URL template model"
        );

        Ok(Self { options, bounds })
    }

    pub fn options(&self) -> &UrlTemplateOptions {
        &self.options
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::new(&self.options.base_url, "TMS", "Tile Map Service")
    }

    fn subdomain(&self, tile: &TileCoordinate) -> &str {
        if self.options.subdomains.is_empty() {
            return "";
        }
        let index = (tile.x + tile.y) % self.options.subdomains.len() as u64;
        &self.options.subdomains[index as usize]
    }
}

impl TileUrlProvider for UrlTemplateModel {
    fn tile_url(&self, tile: &TileCoordinate) -> Option<String> {
        let size = tiles_at_level(1, tile.level);
        if tile.level >= self.options.level_count || tile.x >= size || tile.y >= size {
            return None;
        }
        let flipped = size - 1 - tile.y;

        // {-y} first, otherwise {y} would match inside it
        Some(
            self.options
                .base_url
                .replace("{s}", self.subdomain(tile))
                .replace("{z}", &tile.level.to_string())
                .replace("{x}", &tile.x.to_string())
                .replace("{-y}", &flipped.to_string())
                .replace("{y}", &tile.y.to_string()),
        )
    }

    fn reference(&self) -> &str {
        WEB_MERCATOR
    }

    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn level_count(&self) -> u32 {
        self.options.level_count
    }

    fn level0_dimensions(&self) -> (u64, u64) {
        (1, 1)
    }

    fn tile_size(&self) -> (u32, u32) {
        (TILE_SIZE, TILE_SIZE)
    }
}
