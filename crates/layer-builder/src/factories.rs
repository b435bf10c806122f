//! Default model and layer factories.

use ogc_common::{ConnectorError, ConnectorResult};
use ogcapi_client::TileMatrixSetResolver;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tile_models::{
    FeaturesModel, FeaturesOptions, GridModel, GridOptions, Model, OgcMapsModel, OgcMapsOptions,
    OgcTilesModel, OgcTilesOptions, UrlTemplateModel, UrlTemplateOptions,
};
use tracing::debug;
use uuid::Uuid;

use crate::command::LayerType;
use crate::layer::{Layer, LayerOptions};
use crate::registry::BuildContext;

const GRID_ID: &str = "Grid";

fn parse_options<T: DeserializeOwned>(options: &Value, what: &str) -> ConnectorResult<T> {
    serde_json::from_value(options.clone()).map_err(|e| {
        ConnectorError::InvalidModelOptions(format!("Invalid {} model options: {}", what, e))
    })
}

// ============================================================================
// Models
// ============================================================================

/// Tile matrix sets that are not quad-tree compatible are refused.
pub fn create_open_api_tiles_model(options: &Value, context: &BuildContext) -> ConnectorResult<Model> {
    let options: OgcTilesOptions = parse_options(options, "OGC API Tiles")?;
    TileMatrixSetResolver::ensure_quad_tree_compatible(&options.tile_set)?;
    OgcTilesModel::new(options, &context.crs_registry).map(Model::from)
}

pub fn create_open_api_maps_model(options: &Value, context: &BuildContext) -> ConnectorResult<Model> {
    let options: OgcMapsOptions = parse_options(options, "OGC API Maps")?;
    OgcMapsModel::new(options, &context.crs_registry, &context.axis_policy).map(Model::from)
}

pub fn create_open_api_features_model(
    options: &Value,
    context: &BuildContext,
) -> ConnectorResult<Model> {
    let options: FeaturesOptions = parse_options(options, "OGC API Features")?;
    FeaturesModel::new(options, &context.crs_registry).map(Model::from)
}

pub fn create_tms_model(options: &Value, context: &BuildContext) -> ConnectorResult<Model> {
    let options: UrlTemplateOptions = parse_options(options, "TMS")?;
    UrlTemplateModel::new(options, &context.crs_registry).map(Model::from)
}

/// Missing options fall back to the default grid settings.
pub fn create_grid_model(options: &Value, _context: &BuildContext) -> ConnectorResult<Model> {
    let options: GridOptions = if options.is_null() {
        GridOptions::default()
    } else {
        parse_options(options, "grid")?
    };
    GridModel::new(options).map(Model::from)
}

// ============================================================================
// Layers
// ============================================================================

/// Tiles, maps and TMS layers.
pub fn create_raster_layer(
    model: Model,
    options: &Value,
    layer_type: &LayerType,
) -> ConnectorResult<Layer> {
    if model.as_tile_provider().is_none() {
        return Err(ConnectorError::InvalidModelOptions(format!(
            "{} layers need a tiled model, got {}",
            layer_type,
            model.kind()
        )));
    }
    Ok(layer_with_defaults(model, LayerOptions::from_value(options)?, layer_type))
}

pub fn create_features_layer(
    model: Model,
    options: &Value,
    layer_type: &LayerType,
) -> ConnectorResult<Layer> {
    if !matches!(model, Model::Features(_)) {
        return Err(ConnectorError::InvalidModelOptions(format!(
            "{} layers need a features model, got {}",
            layer_type,
            model.kind()
        )));
    }
    Ok(layer_with_defaults(model, LayerOptions::from_value(options)?, layer_type))
}

/// Grid layers are labelled "Grid" and kept out of the layer control unless
/// the options say otherwise.
pub fn create_grid_layer(
    model: Model,
    options: &Value,
    layer_type: &LayerType,
) -> ConnectorResult<Layer> {
    let options = LayerOptions::from_value(options)?;
    Ok(Layer {
        id: options.id.unwrap_or_else(|| GRID_ID.to_string()),
        label: options.label.unwrap_or_else(|| GRID_ID.to_string()),
        visible: options.visible.unwrap_or(true),
        visible_in_tree: options.visible_in_tree.unwrap_or(false),
        layer_type: layer_type.clone(),
        model,
    })
}

fn layer_with_defaults(model: Model, options: LayerOptions, layer_type: &LayerType) -> Layer {
    let id = options.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let label = options.label.unwrap_or_else(|| model.descriptor().name);
    debug!(id = %id, label = %label, model = model.kind(), "Created layer");
    Layer {
        id,
        label,
        visible: options.visible.unwrap_or(true),
        visible_in_tree: options.visible_in_tree.unwrap_or(true),
        layer_type: layer_type.clone(),
        model,
    }
}
