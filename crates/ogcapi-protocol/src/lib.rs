//! OGC API document types.
//!
//! Client-side view of the OGC API - Common, Tiles and Maps documents the
//! connector reads: landing pages, collection lists, tile matrix sets and
//! tileset listings. Deserialization is lenient: real servers disagree on
//! member names between the 1.0 and 2.0 tile matrix set encodings, so the
//! older names are accepted as aliases.
//!
//! # Example
//!
//! ```rust
//! use ogcapi_protocol::{CollectionLinkType, Link};
//!
//! let link = Link::new("https://example.com/collections/dem/map", "http://www.opengis.net/def/rel/ogc/1.0/map")
//!     .with_type("image/png");
//! assert!(CollectionLinkType::Map.matches(&link));
//! ```

pub mod collections;
pub mod tiles;
pub mod types;

pub use collections::{CollectionInfo, CollectionList, LandingPage};
pub use tiles::{
    TileMatrixLevel, TileMatrixSetItem, TileMatrixSetList, TileSetBoundingBox, TileSetData,
    TilesetItem, TilesetList,
};
pub use types::{CollectionLinkType, CrsValue, Link};

/// Link relation types used when navigating an OGC API service.
pub mod relations {
    pub const SELF: &str = "self";
    pub const DATA: &str = "data";
    pub const DATA_OGC: &str = "http://www.opengis.net/def/rel/ogc/1.0/data";
    pub const ITEMS: &str = "items";
    pub const ITEM: &str = "item";
    pub const TILES: &str = "tiles";
    pub const TILESETS_MAP: &str = "http://www.opengis.net/def/rel/ogc/1.0/tilesets-map";
    pub const TILESETS_VECTOR: &str = "http://www.opengis.net/def/rel/ogc/1.0/tilesets-vector";
    pub const TILESETS_COVERAGE: &str = "http://www.opengis.net/def/rel/ogc/1.0/tilesets-coverage";
    pub const MAP: &str = "map";
    pub const MAP_OGC: &str = "http://www.opengis.net/def/rel/ogc/1.0/map";
    pub const TILING_SCHEMES: &str = "http://www.opengis.net/def/rel/ogc/1.0/tiling-schemes";
    pub const TILING_SCHEME: &str = "http://www.opengis.net/def/rel/ogc/1.0/tiling-scheme";
}

/// Media types the connector negotiates.
pub mod media_types {
    pub const JSON: &str = "application/json";
    pub const GEO_JSON: &str = "application/geo+json";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
}
