//! Factory registry keyed by layer type.

use std::collections::HashMap;
use std::fmt;

use ogc_common::{AxisOrderPolicy, ConnectorResult, CrsRegistry};
use ogcapi_client::ConnectorConfig;
use serde_json::Value;
use tile_models::Model;

use crate::command::LayerType;
use crate::factories;
use crate::layer::Layer;

/// What model factories may consult besides their options.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub crs_registry: CrsRegistry,
    pub axis_policy: AxisOrderPolicy,
}

impl BuildContext {
    /// CRS registry and axis policy from `config`, custom CRSs included.
    pub fn from_config(config: &ConnectorConfig) -> ConnectorResult<Self> {
        Ok(Self {
            crs_registry: config.crs_registry()?,
            axis_policy: config.axis_policy(),
        })
    }
}

pub type ModelFactory = Box<dyn Fn(&Value, &BuildContext) -> ConnectorResult<Model> + Send + Sync>;
pub type LayerFactory =
    Box<dyn Fn(Model, &Value, &LayerType) -> ConnectorResult<Layer> + Send + Sync>;

/// The two steps that turn a command into a layer.
pub struct FactoryPair {
    pub create_model: ModelFactory,
    pub create_layer: LayerFactory,
}

impl FactoryPair {
    pub fn new<M, L>(create_model: M, create_layer: L) -> Self
    where
        M: Fn(&Value, &BuildContext) -> ConnectorResult<Model> + Send + Sync + 'static,
        L: Fn(Model, &Value, &LayerType) -> ConnectorResult<Layer> + Send + Sync + 'static,
    {
        Self {
            create_model: Box::new(create_model),
            create_layer: Box::new(create_layer),
        }
    }
}

impl fmt::Debug for FactoryPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryPair").finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Default)]
pub struct FactoryRegistry {
    factories: HashMap<LayerType, FactoryPair>,
}

impl FactoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Factories for OGC API Tiles, Maps and Features, TMS and the grid.
    /// WMS, WFS and WMTS are left unregistered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            LayerType::OpenApiTiles,
            FactoryPair::new(factories::create_open_api_tiles_model, factories::create_raster_layer),
        );
        registry.register(
            LayerType::OpenApiMaps,
            FactoryPair::new(factories::create_open_api_maps_model, factories::create_raster_layer),
        );
        registry.register(
            LayerType::OpenApiFeatures,
            FactoryPair::new(
                factories::create_open_api_features_model,
                factories::create_features_layer,
            ),
        );
        registry.register(
            LayerType::Tms,
            FactoryPair::new(factories::create_tms_model, factories::create_raster_layer),
        );
        registry.register(
            LayerType::Grid,
            FactoryPair::new(factories::create_grid_model, factories::create_grid_layer),
        );
        registry
    }

    /// Register `pair` for `layer_type`, returning the pair it replaces.
    pub fn register(&mut self, layer_type: LayerType, pair: FactoryPair) -> Option<FactoryPair> {
        self.factories.insert(layer_type, pair)
    }

    pub fn get(&self, layer_type: &LayerType) -> Option<&FactoryPair> {
        self.factories.get(layer_type)
    }

    pub fn contains(&self, layer_type: &LayerType) -> bool {
        self.factories.contains_key(layer_type)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registrations() {
        let registry = FactoryRegistry::with_defaults();
        assert_eq!(registry.len(), 5);
        for layer_type in [
            LayerType::OpenApiTiles,
            LayerType::OpenApiMaps,
            LayerType::OpenApiFeatures,
            LayerType::Tms,
            LayerType::Grid,
        ] {
            assert!(registry.contains(&layer_type), "{} missing", layer_type);
        }
        for layer_type in [LayerType::Wms, LayerType::Wfs, LayerType::Wmts] {
            assert!(!registry.contains(&layer_type));
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FactoryRegistry::new();
        assert!(registry.is_empty());
        let pair = || FactoryPair::new(factories::create_grid_model, factories::create_grid_layer);
        assert!(registry.register(LayerType::Wms, pair()).is_none());
        assert!(registry.register(LayerType::Wms, pair()).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_context_from_config() {
        let config = ConnectorConfig::from_yaml(test_utils::fixtures::CONNECTOR_CONFIG).unwrap();
        let context = BuildContext::from_config(&config).unwrap();
        assert!(context.crs_registry.contains("ESRI:54009"));
        assert!(context.axis_policy.is_reversed_axis_order("EPSG:4258"));
    }
}
