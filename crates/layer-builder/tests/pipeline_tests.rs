//! From a service URL to attached layers, the way the connection forms do it.

use std::sync::Arc;

use layer_builder::{
    BuildContext, Command, CommandOutcome, LayerBuilder, LayerTree, LayerType,
};
use ogc_common::{ConnectorError, TileCoordinate};
use ogcapi_client::{
    select_format, CapabilitiesOptions, CapabilitiesResolver, ConnectorConfig, StaticFetcher,
    TileMatrixSetResolver,
};
use ogcapi_protocol::CollectionLinkType;
use serde_json::json;
use test_utils::fixtures::{self, urls};
use tile_models::Model;

fn service() -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher::from_routes(fixtures::service_routes()))
}

fn builder() -> LayerBuilder<LayerTree> {
    let config = ConnectorConfig::from_yaml(fixtures::CONNECTOR_CONFIG).unwrap();
    LayerBuilder::new(LayerTree::new(), BuildContext::from_config(&config).unwrap())
}

// ============================================================================
// OGC API
// ============================================================================

#[tokio::test]
async fn test_tiles_layer_from_service() {
    let fetcher = service();
    let doc = CapabilitiesResolver::new(fetcher.clone())
        .from_url(urls::SERVICE, CapabilitiesOptions::filtered_by(CollectionLinkType::Tiles))
        .await
        .unwrap();
    let resolver = TileMatrixSetResolver::new(fetcher);

    let tile_set = resolver
        .selectable_tile_sets(&doc)
        .await
        .unwrap()
        .into_iter()
        .find(|set| set.id == "WebMercatorQuad")
        .unwrap();
    let collection = doc.collection("blueMarble").unwrap();
    let links = resolver
        .get_tiles_link(&doc, collection, &tile_set.id)
        .await
        .unwrap();

    let mut builder = builder();
    let command = Command::create_any_layer(
        LayerType::OpenApiTiles,
        json!({
            "baseURL": links[0].href,
            "collection": collection.id,
            "tileMatrix": serde_json::to_value(&tile_set).unwrap(),
        }),
        json!({"label": collection.name}),
    );
    let CommandOutcome::Created(id) = builder.handle_command(command).unwrap() else {
        panic!("tiles layer not created");
    };

    let layer = builder.target().get(&id).unwrap();
    assert_eq!(layer.label, "Blue Marble");
    let provider = layer.model.as_tile_provider().unwrap();
    assert_eq!(
        provider.tile_url(&TileCoordinate::new(1, 0, 0)).as_deref(),
        Some("https://maps.example.com/ogcapi/collections/blueMarble/map/tiles/WebMercatorQuad/1/1/0?f=png")
    );
}

#[tokio::test]
async fn test_maps_layer_from_service() {
    let doc = CapabilitiesResolver::new(service())
        .from_url(urls::SERVICE, CapabilitiesOptions::filtered_by(CollectionLinkType::Map))
        .await
        .unwrap();
    let collection = doc.collection("blueMarble").unwrap();
    let selection = select_format(
        &collection.links_of(CollectionLinkType::Map),
        "image/png",
    )
    .unwrap();

    let mut builder = builder();
    let command = Command::create_any_layer(
        LayerType::OpenApiMaps,
        json!({
            "baseURL": selection.base_url,
            "collection": collection.id,
            "crs": collection.default_reference,
            "format": selection.format,
        }),
        json!(null),
    );
    let CommandOutcome::Created(id) = builder.handle_command(command).unwrap() else {
        panic!("maps layer not created");
    };

    let layer = builder.target().get(&id).unwrap();
    let url = layer
        .model
        .as_tile_provider()
        .unwrap()
        .tile_url(&TileCoordinate::new(0, 0, 0))
        .unwrap();
    assert!(url.contains("&crs=http://www.opengis.net/def/crs/EPSG/0/3857&"));
    assert!(url.contains("&f=image/png&"));
    assert!(url.ends_with("&transparent=true"));
}

#[test]
fn test_features_layer_with_custom_crs() {
    let mut builder = builder();
    let command = Command::from_json(
        r#"{
            "type": "CreateAnyLayer",
            "parameters": {
                "layerType": "OpenApiFeatures",
                "model": {
                    "outputFormat": "application/geo+json",
                    "tmp_reference": "ESRI:54009",
                    "featureUrl": "https://maps.example.com/ogcapi/collections/hydrography/items",
                    "dataUrl": "https://maps.example.com/ogcapi/collections/hydrography/items",
                    "useCrs84Bounds": true
                },
                "layer": {"label": "Hydrography"}
            }
        }"#,
    )
    .unwrap();

    assert!(matches!(
        builder.handle_command(command).unwrap(),
        CommandOutcome::Created(_)
    ));
    let layer = &builder.target().layers()[0];
    assert!(matches!(layer.model, Model::Features(_)));
    assert_eq!(layer.layer_type, LayerType::OpenApiFeatures);
}

// ============================================================================
// Other layer types
// ============================================================================

#[test]
fn test_tms_and_grid_layers() {
    let mut builder = builder();
    let tms = Command::from_json(
        r#"{
            "type": "CreateAnyLayer",
            "parameters": {
                "layerType": "TMS",
                "model": {"baseURL": "https://{s}.tile.example.com/{z}/{x}/{-y}.png", "subdomains": ["a", "b"], "levelCount": 19},
                "layer": {"label": "Streets"}
            }
        }"#,
    )
    .unwrap();
    let grid = Command::from_json(r#"{"type": "CreateAnyLayer", "parameters": {"layerType": "GRID"}}"#)
        .unwrap();

    builder.handle_command(tms).unwrap();
    assert_eq!(
        builder.handle_command(grid).unwrap(),
        CommandOutcome::Created("Grid".to_string())
    );

    let tree = builder.into_target();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.layers()[0].label, "Streets");
    assert!(!tree.get("Grid").unwrap().visible_in_tree);
}

#[test]
fn test_unregistered_and_failing_commands() {
    let mut builder = builder();

    let wmts = Command::create_any_layer(LayerType::Wmts, json!({}), json!({}));
    assert_eq!(builder.handle_command(wmts).unwrap(), CommandOutcome::Ignored);

    let bad_tms = Command::create_any_layer(
        LayerType::Tms,
        json!({"baseURL": "https://{s}.tile.example.com/{z}/{x}/{y}.png"}),
        json!({}),
    );
    assert!(matches!(
        builder.handle_command(bad_tms),
        Err(ConnectorError::InvalidModelOptions(_))
    ));
    assert!(builder.target().is_empty());
}
