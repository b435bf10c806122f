//! The closed set of models a layer can be built on.

use crate::features::FeaturesModel;
use crate::grid::GridModel;
use crate::ogc_maps::OgcMapsModel;
use crate::ogc_tiles::OgcTilesModel;
use crate::provider::{ModelDescriptor, TileUrlProvider};
use crate::url_template::UrlTemplateModel;

#[derive(Debug, Clone)]
pub enum Model {
    OgcTiles(OgcTilesModel),
    OgcMaps(OgcMapsModel),
    UrlTemplate(UrlTemplateModel),
    Features(FeaturesModel),
    Grid(GridModel),
}

impl Model {
    pub fn descriptor(&self) -> ModelDescriptor {
        match self {
            Model::OgcTiles(model) => model.descriptor(),
            Model::OgcMaps(model) => model.descriptor(),
            Model::UrlTemplate(model) => model.descriptor(),
            Model::Features(model) => model.descriptor(),
            Model::Grid(model) => model.descriptor(),
        }
    }

    /// The per-tile URL source of raster models.
    pub fn as_tile_provider(&self) -> Option<&dyn TileUrlProvider> {
        match self {
            Model::OgcTiles(model) => Some(model as &dyn TileUrlProvider),
            Model::OgcMaps(model) => Some(model as &dyn TileUrlProvider),
            Model::UrlTemplate(model) => Some(model as &dyn TileUrlProvider),
            Model::Features(_) | Model::Grid(_) => None,
        }
    }

    /// Short name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Model::OgcTiles(_) => "ogc_tiles",
            Model::OgcMaps(_) => "ogc_maps",
            Model::UrlTemplate(_) => "url_template",
            Model::Features(_) => "features",
            Model::Grid(_) => "grid",
        }
    }
}

impl From<OgcTilesModel> for Model {
    fn from(model: OgcTilesModel) -> Self {
        Model::OgcTiles(model)
    }
}

impl From<OgcMapsModel> for Model {
    fn from(model: OgcMapsModel) -> Self {
        Model::OgcMaps(model)
    }
}

impl From<UrlTemplateModel> for Model {
    fn from(model: UrlTemplateModel) -> Self {
        Model::UrlTemplate(model)
    }
}

impl From<FeaturesModel> for Model {
    fn from(model: FeaturesModel) -> Self {
        Model::Features(model)
    }
}

impl From<GridModel> for Model {
    fn from(model: GridModel) -> Self {
        Model::Grid(model)
    }
}
