//! Core OGC API types used across documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::relations;

/// A hyperlink to a related resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// The URI of the linked resource.
    pub href: String,

    /// The relationship type (e.g., "self", "items", "tiles").
    #[serde(default)]
    pub rel: String,

    /// The media type of the linked resource.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// A human-readable title for the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Whether the link is a URI template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            type_: None,
            title: None,
            templated: None,
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark as a URI template.
    pub fn templated(mut self) -> Self {
        self.templated = Some(true);
        self
    }

    /// Case-insensitive relation check.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.eq_ignore_ascii_case(rel)
    }

    /// The media type, or an empty string when the server left it out.
    pub fn media_type(&self) -> &str {
        self.type_.as_deref().unwrap_or("")
    }
}

/// The kind of collection link a client is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionLinkType {
    /// OGC API - Features item links
    Items,
    /// OGC API - Tiles tileset links
    Tiles,
    /// OGC API - Maps map links
    Map,
}

impl CollectionLinkType {
    /// Link relations accepted for this link type, short names first.
    pub fn relations(&self) -> &'static [&'static str] {
        match self {
            CollectionLinkType::Items => &[relations::ITEMS],
            CollectionLinkType::Tiles => &[
                relations::TILES,
                relations::TILESETS_MAP,
                relations::TILESETS_VECTOR,
                relations::TILESETS_COVERAGE,
            ],
            CollectionLinkType::Map => &[relations::MAP, relations::MAP_OGC],
        }
    }

    /// Whether a link carries one of this type's relations.
    pub fn matches(&self, link: &Link) -> bool {
        self.relations().iter().any(|rel| link.has_rel(rel))
    }
}

impl fmt::Display for CollectionLinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectionLinkType::Items => "items",
            CollectionLinkType::Tiles => "tiles",
            CollectionLinkType::Map => "map",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CollectionLinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "items" | "features" => Ok(CollectionLinkType::Items),
            "tiles" => Ok(CollectionLinkType::Tiles),
            "map" | "maps" => Ok(CollectionLinkType::Map),
            _ => Err(format!("Unknown collection link type: {}", s)),
        }
    }
}

/// A CRS as encoded in tile matrix set documents: either a plain URI or an
/// object carrying a `uri` (or a `wkt` definition).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CrsValue {
    Uri(String),
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uri: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wkt: Option<serde_json::Value>,
    },
}

impl CrsValue {
    pub fn uri(&self) -> Option<&str> {
        match self {
            CrsValue::Uri(uri) => Some(uri),
            CrsValue::Object { uri, .. } => uri.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_deserialize_without_type() {
        let link: Link =
            serde_json::from_str(r#"{"href": "https://example.com/items", "rel": "items"}"#)
                .unwrap();
        assert_eq!(link.media_type(), "");
        assert!(CollectionLinkType::Items.matches(&link));
        assert!(!CollectionLinkType::Map.matches(&link));
    }

    #[test]
    fn test_tiles_link_type_accepts_ogc_relations() {
        let link = Link::new(
            "https://example.com/collections/a/map/tiles",
            "http://www.opengis.net/def/rel/ogc/1.0/tilesets-map",
        );
        assert!(CollectionLinkType::Tiles.matches(&link));
        let legacy = Link::new("https://example.com/collections/a/tiles", "TILES");
        assert!(CollectionLinkType::Tiles.matches(&legacy));
    }

    #[test]
    fn test_link_type_from_str() {
        assert_eq!("Map".parse::<CollectionLinkType>().unwrap(), CollectionLinkType::Map);
        assert_eq!(
            "features".parse::<CollectionLinkType>().unwrap(),
            CollectionLinkType::Items
        );
        assert!("coverage".parse::<CollectionLinkType>().is_err());
    }

    #[test]
    fn test_crs_value_forms() {
        let plain: CrsValue =
            serde_json::from_str(r#""http://www.opengis.net/def/crs/EPSG/0/3857""#).unwrap();
        assert_eq!(plain.uri(), Some("http://www.opengis.net/def/crs/EPSG/0/3857"));

        let object: CrsValue =
            serde_json::from_str(r#"{"uri": "http://www.opengis.net/def/crs/OGC/1.3/CRS84"}"#)
                .unwrap();
        assert_eq!(object.uri(), Some("http://www.opengis.net/def/crs/OGC/1.3/CRS84"));

        let wkt: CrsValue = serde_json::from_str(r#"{"wkt": {"type": "GeographicCRS"}}"#).unwrap();
        assert_eq!(wkt.uri(), None);
    }
}
