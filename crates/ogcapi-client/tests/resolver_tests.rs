//! Capabilities and tile matrix set resolution against the demonstration
//! service documents.

use std::sync::Arc;

use ogc_common::ConnectorError;
use ogcapi_client::{
    select_format, ApplyOutcome, CapabilitiesOptions, CapabilitiesResolver, ConnectionSession,
    ConnectorConfig, StaticFetcher, TileMatrixSetResolver,
};
use ogcapi_protocol::CollectionLinkType;
use test_utils::fixtures::{self, urls};
use test_utils::{collection_json, collection_list_json};

fn service() -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher::from_routes(fixtures::service_routes()))
}

// ============================================================================
// Capabilities
// ============================================================================

#[tokio::test]
async fn test_landing_page_data_link_followed() {
    let fetcher = service();
    let resolver = CapabilitiesResolver::new(fetcher.clone());

    let doc = resolver
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();

    assert_eq!(doc.title.as_deref(), Some("Example OGC API"));
    let ids: Vec<&str> = doc.collections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["blueMarble", "hydrography", "elevation"]);
    assert_eq!(
        fetcher.requested(),
        vec![urls::SERVICE.to_string(), urls::COLLECTIONS.to_string()]
    );
}

#[tokio::test]
async fn test_collection_list_url_accepted_directly() {
    let resolver = CapabilitiesResolver::new(service());
    let doc = resolver
        .from_url(urls::COLLECTIONS, CapabilitiesOptions::default())
        .await
        .unwrap();
    assert_eq!(doc.collections.len(), 3);
    assert!(doc.title.is_none());
    assert!(doc.server.landing_links.is_empty());
}

#[tokio::test]
async fn test_filter_by_items_drops_collections() {
    let resolver = CapabilitiesResolver::new(service());
    let doc = resolver
        .from_url(
            urls::SERVICE,
            CapabilitiesOptions::filtered_by(CollectionLinkType::Items),
        )
        .await
        .unwrap();

    let ids: Vec<&str> = doc.collections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["hydrography"]);
    for collection in &doc.collections {
        assert!(!collection.links_of(CollectionLinkType::Items).is_empty());
    }
}

#[tokio::test]
async fn test_filter_keeps_only_matching_collections() {
    let list = collection_list_json(vec![
        collection_json("a", &[("items", "https://example.com/a/items", "application/geo+json")]),
        collection_json("b", &[("self", "https://example.com/b", "application/json")]),
    ]);
    let fetcher = StaticFetcher::new().with("https://example.com/collections", list.to_string());
    let resolver = CapabilitiesResolver::new(Arc::new(fetcher));

    let doc = resolver
        .from_url(
            "https://example.com/collections",
            CapabilitiesOptions::filtered_by(CollectionLinkType::Items),
        )
        .await
        .unwrap();
    assert_eq!(doc.collections.len(), 1);
    assert_eq!(doc.collections[0].id, "a");
}

#[tokio::test]
async fn test_relative_hrefs_completed() {
    let resolver = CapabilitiesResolver::new(service());
    let doc = resolver
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();

    let blue_marble = doc.collection("blueMarble").unwrap();
    let tiles = blue_marble.links_of(CollectionLinkType::Tiles);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].href, urls::BLUE_MARBLE_TILESETS);
    assert_eq!(
        blue_marble.default_reference,
        "http://www.opengis.net/def/crs/EPSG/0/3857"
    );
}

#[tokio::test]
async fn test_map_format_selection() {
    let resolver = CapabilitiesResolver::new(service());
    let doc = resolver
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    let config = ConnectorConfig::default();

    let blue_marble = doc.collection("blueMarble").unwrap();
    let selection = select_format(
        &blue_marble.links_of(CollectionLinkType::Map),
        &config.preferred_image_format,
    )
    .unwrap();
    assert_eq!(selection.format, "image/png");

    // Only a TIFF map is offered: the first link wins
    let elevation = doc.collection("elevation").unwrap();
    let selection = select_format(
        &elevation.links_of(CollectionLinkType::Map),
        &config.preferred_image_format,
    )
    .unwrap();
    assert_eq!(selection.format, "image/tiff");
    assert_eq!(
        selection.base_url,
        "https://maps.example.com/ogcapi/collections/elevation/map?f=tif"
    );
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let resolver = CapabilitiesResolver::new(Arc::new(StaticFetcher::new()));
    let err = resolver
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::Network(_)));
}

#[tokio::test]
async fn test_non_conformant_collections_is_parse_error() {
    let fetcher = StaticFetcher::new()
        .with("https://example.com/collections", r#"{"collections": [{"title": "no id"}]}"#);
    let resolver = CapabilitiesResolver::new(Arc::new(fetcher));
    let err = resolver
        .from_url("https://example.com/collections", CapabilitiesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::Parse(_)));
}

// ============================================================================
// Tile matrix sets
// ============================================================================

#[tokio::test]
async fn test_tile_sets_listed_from_tiling_schemes_link() {
    let fetcher = service();
    let doc = CapabilitiesResolver::new(fetcher.clone())
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    let resolver = TileMatrixSetResolver::new(fetcher);

    let metas = resolver.fetch_tile_sets(&doc).await.unwrap();
    let ids: Vec<&str> = metas.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["WebMercatorQuad", "WorldCRS84Quad", "IrregularLatLon"]);
    assert_eq!(metas[1].href.as_deref(), Some(urls::WORLD_CRS84_QUAD));
}

#[tokio::test]
async fn test_fetch_in_full_and_selectable() {
    let fetcher = service();
    let doc = CapabilitiesResolver::new(fetcher.clone())
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    let resolver = TileMatrixSetResolver::new(fetcher);

    let all = resolver.fetch_tile_sets_in_full(&doc).await.unwrap();
    assert_eq!(all.len(), 3);

    let selectable = resolver.selectable_tile_sets(&doc).await.unwrap();
    let ids: Vec<&str> = selectable.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["WebMercatorQuad", "WorldCRS84Quad"]);
}

#[tokio::test]
async fn test_tiles_link_from_listing() {
    let fetcher = service();
    let doc = CapabilitiesResolver::new(fetcher.clone())
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    let resolver = TileMatrixSetResolver::new(fetcher);
    let collection = doc.collection("blueMarble").unwrap();

    let links = resolver
        .get_tiles_link(&doc, collection, "WebMercatorQuad")
        .await
        .unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(
        links[0].href,
        "https://maps.example.com/ogcapi/collections/blueMarble/map/tiles/WebMercatorQuad/{tileMatrix}/{tileRow}/{tileCol}?f=png"
    );
}

#[tokio::test]
async fn test_tiles_link_from_tileset_document() {
    let fetcher = service();
    let doc = CapabilitiesResolver::new(fetcher.clone())
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    let resolver = TileMatrixSetResolver::new(fetcher.clone());
    let collection = doc.collection("blueMarble").unwrap();

    let links = resolver
        .get_tiles_link(&doc, collection, "WorldCRS84Quad")
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(
        links[0].href,
        "https://maps.example.com/ogcapi/collections/blueMarble/map/tiles/WorldCRS84Quad/{tileMatrix}/{tileRow}/{tileCol}?f=png"
    );
    assert!(fetcher
        .requested()
        .contains(&urls::BLUE_MARBLE_CRS84_TILESET.to_string()));
}

#[tokio::test]
async fn test_tiles_link_missing_is_empty() {
    let fetcher = service();
    let doc = CapabilitiesResolver::new(fetcher.clone())
        .from_url(urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    let resolver = TileMatrixSetResolver::new(fetcher);

    // No tiles link at all
    let hydrography = doc.collection("hydrography").unwrap();
    assert!(resolver
        .get_tiles_link(&doc, hydrography, "WebMercatorQuad")
        .await
        .unwrap()
        .is_empty());

    // Tiles link, but no tileset in that tile matrix set
    let blue_marble = doc.collection("blueMarble").unwrap();
    assert!(resolver
        .get_tiles_link(&doc, blue_marble, "IrregularLatLon")
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_session_connect_and_select() {
    let fetcher = service();
    let capabilities = CapabilitiesResolver::new(fetcher.clone());
    let tile_sets = TileMatrixSetResolver::new(fetcher);
    let mut session = ConnectionSession::new();

    let outcome = session
        .connect(&capabilities, urls::SERVICE, CapabilitiesOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(session.service_url(), Some(urls::SERVICE));

    session.load_tile_sets(&tile_sets).await.unwrap();
    assert_eq!(session.tile_sets().len(), 2);
    assert!(session.select_tile_set("IrregularLatLon").is_none());
    assert_eq!(
        session.select_tile_set("WorldCRS84Quad").map(|s| s.id.as_str()),
        Some("WorldCRS84Quad")
    );
    assert!(session.select_collection("blueMarble").is_some());
}

#[tokio::test]
async fn test_tile_sets_need_capabilities() {
    let tile_sets = TileMatrixSetResolver::new(service());
    let mut session = ConnectionSession::new();

    let err = session.load_tile_sets(&tile_sets).await.unwrap_err();
    assert!(matches!(err, ConnectorError::MissingCapabilities(_)));
    assert_eq!(err.kind(), "missing_capabilities");
    assert!(!err.is_fetch_failure());
    assert!(session.tile_sets().is_empty());
}
