//! OGC API documents of a demonstration service.
//!
//! The documents are checked in under `testdata/` and compiled in, so tests
//! never touch the network. [`service_routes`] pairs each document with the
//! URL it is served from.

/// Service URLs of the demonstration server.
pub mod urls {
    /// Landing page
    pub const SERVICE: &str = "https://maps.example.com/ogcapi";
    pub const COLLECTIONS: &str = "https://maps.example.com/ogcapi/collections";
    pub const TILE_MATRIX_SETS: &str = "https://maps.example.com/ogcapi/tileMatrixSets";
    pub const WEB_MERCATOR_QUAD: &str =
        "https://maps.example.com/ogcapi/tileMatrixSets/WebMercatorQuad";
    pub const WORLD_CRS84_QUAD: &str =
        "https://maps.example.com/ogcapi/tileMatrixSets/WorldCRS84Quad";
    pub const IRREGULAR_LAT_LON: &str =
        "https://maps.example.com/ogcapi/tileMatrixSets/IrregularLatLon";
    pub const BLUE_MARBLE_TILESETS: &str =
        "https://maps.example.com/ogcapi/collections/blueMarble/map/tiles";
    pub const BLUE_MARBLE_CRS84_TILESET: &str =
        "https://maps.example.com/ogcapi/collections/blueMarble/map/tiles/WorldCRS84Quad";
}

/// Landing page with `data` and `tiling-schemes` links.
pub const LANDING_PAGE: &str = include_str!("../testdata/landing_page.json");

/// Three collections: `blueMarble` (tiles + map), `hydrography` (items only)
/// and `elevation` (legacy `tiles` relation, map in an unusual format).
pub const COLLECTIONS: &str = include_str!("../testdata/collections.json");

/// Listing of WebMercatorQuad, WorldCRS84Quad and IrregularLatLon.
pub const TILE_MATRIX_SETS: &str = include_str!("../testdata/tile_matrix_sets.json");

/// 2.0 encoding, 1x1 root, four levels.
pub const WEB_MERCATOR_QUAD: &str = include_str!("../testdata/web_mercator_quad.json");

/// 1.0 encoding (`identifier`, `supportedCRS`, `tileMatrix`), 2x1 root.
pub const WORLD_CRS84_QUAD: &str = include_str!("../testdata/world_crs84_quad.json");

/// Lat/lon ordered, bottom-left origin, dimensions that do not double.
pub const IRREGULAR_LAT_LON: &str = include_str!("../testdata/irregular_lat_lon.json");

/// Tileset listing of `blueMarble`; the CRS84 entry carries no tile links.
pub const BLUE_MARBLE_TILESETS: &str = include_str!("../testdata/blue_marble_tilesets.json");

/// Tileset document of `blueMarble` in WorldCRS84Quad.
pub const BLUE_MARBLE_CRS84_TILESET: &str =
    include_str!("../testdata/blue_marble_crs84_tileset.json");

/// Connector configuration with a custom CRS and an extended allow-list.
pub const CONNECTOR_CONFIG: &str = include_str!("../testdata/connector.yaml");

/// Every document of the demonstration service keyed by its URL.
pub fn service_routes() -> Vec<(&'static str, &'static str)> {
    vec![
        (urls::SERVICE, LANDING_PAGE),
        (urls::COLLECTIONS, COLLECTIONS),
        (urls::TILE_MATRIX_SETS, TILE_MATRIX_SETS),
        (urls::WEB_MERCATOR_QUAD, WEB_MERCATOR_QUAD),
        (urls::WORLD_CRS84_QUAD, WORLD_CRS84_QUAD),
        (urls::IRREGULAR_LAT_LON, IRREGULAR_LAT_LON),
        (urls::BLUE_MARBLE_TILESETS, BLUE_MARBLE_TILESETS),
        (urls::BLUE_MARBLE_CRS84_TILESET, BLUE_MARBLE_CRS84_TILESET),
    ]
}

/// Common CRS identifiers.
pub mod crs {
    pub const CRS84_URI: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";
    pub const EPSG_3857_URI: &str = "http://www.opengis.net/def/crs/EPSG/0/3857";
    pub const EPSG_4326_URI: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";
    pub const EPSG_4269_URI: &str = "http://www.opengis.net/def/crs/EPSG/0/4269";

    pub const EPSG_4326: &str = "EPSG:4326";
    pub const EPSG_3857: &str = "EPSG:3857";
    pub const CRS_84: &str = "CRS:84";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_are_valid_json() {
        for (url, body) in service_routes() {
            assert!(
                serde_json::from_str::<serde_json::Value>(body).is_ok(),
                "document for {} is not valid JSON",
                url
            );
        }
    }

    #[test]
    fn test_routes_are_unique() {
        let routes = service_routes();
        let mut urls: Vec<&str> = routes.iter().map(|(url, _)| *url).collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), routes.len());
    }
}
