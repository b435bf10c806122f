//! Layers and the tree they are attached to.

use ogc_common::{ConnectorError, ConnectorResult};
use serde::Deserialize;
use serde_json::Value;
use tile_models::Model;

use crate::command::LayerType;

/// Layer options as carried by a layer command. Unset fields take the
/// defaults of the layer factory.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerOptions {
    pub id: Option<String>,
    pub label: Option<String>,
    pub visible: Option<bool>,
    pub visible_in_tree: Option<bool>,
}

impl LayerOptions {
    /// `null` reads as no options.
    pub fn from_value(value: &Value) -> ConnectorResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| ConnectorError::InvalidModelOptions(format!("Invalid layer options: {}", e)))
    }
}

#[derive(Debug)]
pub struct Layer {
    pub id: String,
    pub label: String,
    pub visible: bool,
    /// Whether the layer is listed in the layer control.
    pub visible_in_tree: bool,
    pub layer_type: LayerType,
    pub model: Model,
}

/// Whatever owns the layers of a map.
pub trait LayerTarget {
    fn add_layer(&mut self, layer: Layer);
}

/// An in-memory layer list, bottom layer first.
#[derive(Debug, Default)]
pub struct LayerTree {
    layers: Vec<Layer>,
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Layer> {
        let index = self.layers.iter().position(|layer| layer.id == id)?;
        Some(self.layers.remove(index))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl LayerTarget for LayerTree {
    fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }
}
