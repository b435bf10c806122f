//! Tile matrix set resolution and per-collection tile links.

use std::sync::Arc;

use futures::future::try_join_all;
use ogc_common::{quad_tree_level_offset, ConnectorError, ConnectorResult};
use ogcapi_protocol::{
    relations, CollectionLinkType, Link, TileMatrixSetList, TileSetData, TilesetItem, TilesetList,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::capabilities::{CapabilitiesDocument, Collection};
use crate::fetcher::{fetch_json, HttpFetcher};

/// A tile matrix set as listed by the service, before its definition is
/// fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSetMeta {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Absolute URL of the definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Fetches tile matrix sets and tileset links of a service.
#[derive(Clone)]
pub struct TileMatrixSetResolver {
    fetcher: Arc<dyn HttpFetcher>,
}

impl TileMatrixSetResolver {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { fetcher }
    }

    /// List the service's tile matrix sets without fetching definitions.
    #[instrument(skip(self, doc), fields(base = %doc.server.base_url))]
    pub async fn fetch_tile_sets(
        &self,
        doc: &CapabilitiesDocument,
    ) -> ConnectorResult<Vec<TileSetMeta>> {
        let href = doc
            .server
            .landing_link(relations::TILING_SCHEMES)
            .map(|l| l.href.clone())
            .unwrap_or_else(|| "tileMatrixSets".to_string());
        let url = doc.server.resolve(&href)?;

        let list: TileMatrixSetList =
            fetch_json(self.fetcher.as_ref(), &url, "tile_matrix_sets").await?;

        let mut metas = Vec::with_capacity(list.tile_matrix_sets.len());
        for item in list.tile_matrix_sets {
            let Some(id) = item.identifier() else {
                debug!("Skipping tile matrix set entry without id or uri");
                continue;
            };
            let href = item
                .definition_link()
                .map(|l| doc.server.complete(&l.href))
                .transpose()?;
            metas.push(TileSetMeta {
                id,
                title: item.title,
                href,
            });
        }

        info!(count = metas.len(), "Listed tile matrix sets");
        Ok(metas)
    }

    /// Fetch the full definition of one tile matrix set.
    #[instrument(skip(self, doc, meta), fields(id = %meta.id))]
    pub async fn fetch_tileset(
        &self,
        doc: &CapabilitiesDocument,
        meta: &TileSetMeta,
    ) -> ConnectorResult<TileSetData> {
        let href = meta
            .href
            .clone()
            .unwrap_or_else(|| format!("tileMatrixSets/{}", meta.id));
        let url = doc.server.resolve(&href)?;
        fetch_json(self.fetcher.as_ref(), &url, "tile_matrix_set").await
    }

    /// Fetch every listed tile matrix set concurrently.
    ///
    /// Fails as a whole when any single definition fails.
    pub async fn fetch_tile_sets_in_full(
        &self,
        doc: &CapabilitiesDocument,
    ) -> ConnectorResult<Vec<TileSetData>> {
        let metas = self.fetch_tile_sets(doc).await?;
        try_join_all(metas.iter().map(|meta| self.fetch_tileset(doc, meta))).await
    }

    /// Full definitions of the quad-tree compatible sets only.
    pub async fn selectable_tile_sets(
        &self,
        doc: &CapabilitiesDocument,
    ) -> ConnectorResult<Vec<TileSetData>> {
        let sets = self.fetch_tile_sets_in_full(doc).await?;
        Ok(sets
            .into_iter()
            .filter(|set| {
                let offset = Self::get_quad_tree_compatible_level_offset(set);
                if offset != 0 {
                    debug!(id = %set.id, offset = offset, "Tile matrix set is not selectable");
                }
                offset == 0
            })
            .collect())
    }

    /// Quad-tree level offset of `set`: 0 when usable as is, `k > 0` when
    /// its top `k` levels are missing, -1 when it is not a quad-tree.
    pub fn get_quad_tree_compatible_level_offset(set: &TileSetData) -> i32 {
        quad_tree_level_offset(&set.level_dimensions())
    }

    pub fn ensure_quad_tree_compatible(set: &TileSetData) -> ConnectorResult<()> {
        match Self::get_quad_tree_compatible_level_offset(set) {
            0 => Ok(()),
            offset => Err(ConnectorError::UnsupportedTileMatrixSet {
                id: set.id.clone(),
                offset,
            }),
        }
    }

    /// Templated tile links of `collection` in tile matrix set
    /// `tile_matrix_set_id`, with absolute hrefs.
    ///
    /// Empty when the collection has no tiles link or no tileset in that
    /// tile matrix set.
    #[instrument(skip(self, doc, collection), fields(collection = %collection.id))]
    pub async fn get_tiles_link(
        &self,
        doc: &CapabilitiesDocument,
        collection: &Collection,
        tile_matrix_set_id: &str,
    ) -> ConnectorResult<Vec<Link>> {
        let Some(tiles_link) = collection.links_of(CollectionLinkType::Tiles).first().copied()
        else {
            debug!("Collection has no tiles link");
            return Ok(Vec::new());
        };

        let listing_url = doc.server.resolve(&tiles_link.href)?;
        let listing: TilesetList =
            fetch_json(self.fetcher.as_ref(), &listing_url, "tilesets").await?;

        let Some(tileset) = listing
            .tilesets
            .iter()
            .find(|t| t.references_tile_matrix_set(tile_matrix_set_id))
        else {
            warn!(
                tile_matrix_set = %tile_matrix_set_id,
                "No tileset for tile matrix set"
            );
            return Ok(Vec::new());
        };

        let mut links: Vec<Link> = tileset.tile_links().into_iter().cloned().collect();
        if links.is_empty() {
            if let Some(self_link) = tileset.self_link() {
                let url = doc.server.resolve(&self_link.href)?;
                let document: TilesetItem =
                    fetch_json(self.fetcher.as_ref(), &url, "tileset").await?;
                links = document.tile_links().into_iter().cloned().collect();
            }
        }

        links
            .into_iter()
            .map(|mut link| {
                link.href = doc.server.complete(&link.href)?;
                Ok(link)
            })
            .collect()
    }
}
