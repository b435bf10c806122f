//! Tile and request URL construction for OGC API layers.
//!
//! Every model is built once from the options of a layer command and is
//! immutable afterwards. Raster models implement [`TileUrlProvider`] and are
//! asked for one URL per visible tile.

pub mod features;
pub mod grid;
pub mod model;
pub mod ogc_maps;
pub mod ogc_tiles;
pub mod provider;
pub mod query;
pub mod url_template;
pub mod wms;

pub use features::{FeaturesModel, FeaturesOptions};
pub use grid::{default_grid_settings, GridModel, GridOptions, GridSetting};
pub use model::Model;
pub use ogc_maps::{OgcMapsModel, OgcMapsOptions};
pub use ogc_tiles::{OgcTilesModel, OgcTilesOptions};
pub use provider::{ModelDescriptor, TileUrlProvider};
pub use url_template::{UrlTemplateModel, UrlTemplateOptions};
pub use wms::WmsTileScheme;
