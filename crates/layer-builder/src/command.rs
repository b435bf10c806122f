//! Commands issued by the connection forms.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tile_models::Model;

/// Kind of command. Only layer creation is handled here; every other
/// command belongs to the UI and is passed through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandType {
    CreateAnyLayer,
    Other(String),
}

impl From<String> for CommandType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CreateAnyLayer" => CommandType::CreateAnyLayer,
            _ => CommandType::Other(s),
        }
    }
}

impl From<CommandType> for String {
    fn from(command_type: CommandType) -> Self {
        command_type.to_string()
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandType::CreateAnyLayer => f.write_str("CreateAnyLayer"),
            CommandType::Other(name) => f.write_str(name),
        }
    }
}

/// Layer type tag of a `CreateAnyLayer` command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerType {
    Wms,
    Wfs,
    Wmts,
    Tms,
    OpenApiTiles,
    OpenApiMaps,
    OpenApiFeatures,
    Grid,
    Other(String),
}

impl LayerType {
    pub fn as_str(&self) -> &str {
        match self {
            LayerType::Wms => "WMS",
            LayerType::Wfs => "WFS",
            LayerType::Wmts => "WMTS",
            LayerType::Tms => "TMS",
            LayerType::OpenApiTiles => "OpenApiTiles",
            LayerType::OpenApiMaps => "OpenApiMaps",
            LayerType::OpenApiFeatures => "OpenApiFeatures",
            LayerType::Grid => "GRID",
            LayerType::Other(name) => name,
        }
    }
}

impl From<String> for LayerType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WMS" => LayerType::Wms,
            "WFS" => LayerType::Wfs,
            "WMTS" => LayerType::Wmts,
            "TMS" => LayerType::Tms,
            "OpenApiTiles" => LayerType::OpenApiTiles,
            "OpenApiMaps" => LayerType::OpenApiMaps,
            "OpenApiFeatures" => LayerType::OpenApiFeatures,
            "GRID" => LayerType::Grid,
            _ => LayerType::Other(s),
        }
    }
}

impl From<&str> for LayerType {
    fn from(s: &str) -> Self {
        LayerType::from(s.to_string())
    }
}

impl From<LayerType> for String {
    fn from(layer_type: LayerType) -> Self {
        layer_type.as_str().to_string()
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandParameters {
    #[serde(default)]
    pub layer_type: Option<LayerType>,

    /// Model options, interpreted by the model factory of `layer_type`.
    #[serde(default)]
    pub model: Value,

    /// Layer options, interpreted by the layer factory of `layer_type`.
    #[serde(default)]
    pub layer: Value,

    /// An already built model. Taken by the builder instead of running the
    /// model factory.
    #[serde(skip)]
    pub reusable_model: Option<Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "type")]
    pub command_type: CommandType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<CommandParameters>,
}

impl Command {
    pub fn create_any_layer(layer_type: LayerType, model: Value, layer: Value) -> Self {
        Self {
            command_type: CommandType::CreateAnyLayer,
            parameters: Some(CommandParameters {
                layer_type: Some(layer_type),
                model,
                layer,
                reusable_model: None,
            }),
        }
    }

    pub fn with_reusable_model(mut self, model: Model) -> Self {
        self.parameters
            .get_or_insert_with(CommandParameters::default)
            .reusable_model = Some(model);
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
