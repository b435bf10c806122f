//! Landing page and collection documents.

use serde::{Deserialize, Serialize};

use crate::relations;
use crate::types::Link;

/// OGC API landing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LandingPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl LandingPage {
    /// The link to the collection list, if the landing page advertises one.
    pub fn data_link(&self) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.has_rel(relations::DATA) || l.has_rel(relations::DATA_OGC))
    }

    /// The link to the tile matrix set list, if advertised.
    pub fn tiling_schemes_link(&self) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.has_rel(relations::TILING_SCHEMES))
    }
}

/// The list of collections offered by a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionList {
    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,

    /// The collections.
    pub collections: Vec<CollectionInfo>,
}

/// A collection as described by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    /// Unique identifier for the collection.
    pub id: String,

    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Coordinate reference systems supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Vec<String>>,

    /// CRS the data is stored in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_crs: Option<String>,

    /// Spatial and temporal extent, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<serde_json::Value>,
}
