//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use tracing::info;

use layer_builder::{BuildContext, Command, CommandOutcome, LayerBuilder, LayerTree, LayerType};
use ogc_common::{tiles_at_level, TileCoordinate};
use ogcapi_client::{
    available_formats, select_format, CapabilitiesDocument, CapabilitiesOptions,
    CapabilitiesResolver, ConnectorConfig, HttpFetcher, ReqwestFetcher, TileMatrixSetResolver,
};
use ogcapi_protocol::CollectionLinkType;

use crate::Commands;

pub async fn run(config_path: Option<&Path>, command: Commands) -> Result<()> {
    let config = ConnectorConfig::load_or_default(config_path)
        .context("Failed to load connector configuration")?;
    let fetcher: Arc<dyn HttpFetcher> =
        Arc::new(ReqwestFetcher::new(&config).context("Failed to create HTTP client")?);

    match command {
        Commands::Capabilities { url, filter } => capabilities(fetcher, &url, filter).await,
        Commands::Tilesets { url, all } => tilesets(fetcher, &url, all).await,
        Commands::TileUrl {
            url,
            collection,
            tile_matrix_set,
            maps,
            crs,
            level,
            x,
            y,
        } => {
            let request = TileRequest {
                collection,
                tile_matrix_set,
                maps,
                crs,
                tile: TileCoordinate::new(level, x, y),
            };
            tile_url(fetcher, &config, &url, request).await
        }
        Commands::Build { command, level } => build(&config, &command, level),
    }
}

async fn fetch_capabilities(
    fetcher: Arc<dyn HttpFetcher>,
    url: &str,
    options: CapabilitiesOptions,
) -> Result<CapabilitiesDocument> {
    CapabilitiesResolver::new(fetcher)
        .from_url(url, options)
        .await
        .with_context(|| format!("Failed to fetch capabilities from {}", url))
}

async fn capabilities(
    fetcher: Arc<dyn HttpFetcher>,
    url: &str,
    filter: Option<CollectionLinkType>,
) -> Result<()> {
    let options = CapabilitiesOptions {
        filter_collections_by_link_type: filter,
    };
    let doc = fetch_capabilities(fetcher, url, options).await?;

    if let Some(title) = &doc.title {
        println!("{}", title);
    }
    println!("{} collections", doc.collections.len());
    println!();

    for collection in &doc.collections {
        println!("{} ({})", collection.id, collection.name);
        println!("  CRS: {}", collection.default_reference);
        for link_type in [
            CollectionLinkType::Items,
            CollectionLinkType::Tiles,
            CollectionLinkType::Map,
        ] {
            let links = collection.links_of(link_type);
            if !links.is_empty() {
                println!("  {}: {}", link_type, available_formats(&links).join(", "));
            }
        }
    }
    Ok(())
}

async fn tilesets(fetcher: Arc<dyn HttpFetcher>, url: &str, all: bool) -> Result<()> {
    let doc = fetch_capabilities(fetcher.clone(), url, CapabilitiesOptions::default()).await?;
    let resolver = TileMatrixSetResolver::new(fetcher);

    let sets = if all {
        resolver.fetch_tile_sets_in_full(&doc).await
    } else {
        resolver.selectable_tile_sets(&doc).await
    }
    .context("Failed to fetch tile matrix sets")?;

    for set in &sets {
        let offset = TileMatrixSetResolver::get_quad_tree_compatible_level_offset(set);
        println!(
            "{:<28} {:<48} levels={:<3} offset={}",
            set.id,
            set.crs,
            set.tile_matrices.len(),
            offset
        );
    }
    Ok(())
}

struct TileRequest {
    collection: String,
    tile_matrix_set: String,
    maps: bool,
    crs: Option<String>,
    tile: TileCoordinate,
}

/// Build the layer command the connection forms would send, run it and
/// print the URL of the requested tile.
async fn tile_url(
    fetcher: Arc<dyn HttpFetcher>,
    config: &ConnectorConfig,
    url: &str,
    request: TileRequest,
) -> Result<()> {
    let link_type = if request.maps {
        CollectionLinkType::Map
    } else {
        CollectionLinkType::Tiles
    };
    let doc = fetch_capabilities(
        fetcher.clone(),
        url,
        CapabilitiesOptions::filtered_by(link_type),
    )
    .await?;
    let collection = doc
        .collection(&request.collection)
        .ok_or_else(|| anyhow!("No collection '{}' with {} links", request.collection, link_type))?;

    let command = if request.maps {
        let selection = select_format(
            &collection.links_of(CollectionLinkType::Map),
            &config.preferred_image_format,
        )
        .ok_or_else(|| anyhow!("Collection '{}' has no map links", collection.id))?;
        Command::create_any_layer(
            LayerType::OpenApiMaps,
            json!({
                "baseURL": selection.base_url,
                "collection": collection.id,
                "crs": request.crs.as_deref().unwrap_or(&collection.default_reference),
                "format": selection.format,
            }),
            json!({ "label": collection.name }),
        )
    } else {
        let resolver = TileMatrixSetResolver::new(fetcher);
        let metas = resolver
            .fetch_tile_sets(&doc)
            .await
            .context("Failed to list tile matrix sets")?;
        let meta = metas
            .iter()
            .find(|meta| meta.id == request.tile_matrix_set)
            .ok_or_else(|| anyhow!("No tile matrix set '{}'", request.tile_matrix_set))?;
        let tile_set = resolver
            .fetch_tileset(&doc, meta)
            .await
            .with_context(|| format!("Failed to fetch tile matrix set {}", meta.id))?;

        let links = resolver
            .get_tiles_link(&doc, collection, &tile_set.id)
            .await
            .context("Failed to resolve tile links")?;
        let selection = select_format(&links, &config.preferred_image_format).ok_or_else(|| {
            anyhow!(
                "Collection '{}' has no tiles in {}",
                collection.id,
                tile_set.id
            )
        })?;
        info!(format = %selection.format, "Selected tile format");

        Command::create_any_layer(
            LayerType::OpenApiTiles,
            json!({
                "baseURL": selection.base_url,
                "collection": collection.id,
                "tileMatrix": serde_json::to_value(&tile_set)?,
            }),
            json!({ "label": collection.name }),
        )
    };

    let context = BuildContext::from_config(config).context("Invalid CRS definitions")?;
    let mut builder = LayerBuilder::new(LayerTree::new(), context);
    let CommandOutcome::Created(id) = builder.handle_command(command)? else {
        bail!("Layer was not created");
    };

    let layer = builder
        .target()
        .get(&id)
        .ok_or_else(|| anyhow!("Layer {} missing from the tree", id))?;
    let provider = layer
        .model
        .as_tile_provider()
        .ok_or_else(|| anyhow!("Layer {} has no tiles", id))?;
    let tile = request.tile;
    let url = provider.tile_url(&tile).ok_or_else(|| {
        anyhow!(
            "Tile {}/{}/{} is outside the pyramid",
            tile.level,
            tile.x,
            tile.y
        )
    })?;
    println!("{}", url);
    Ok(())
}

fn build(config: &ConnectorConfig, path: &Path, level: Option<u32>) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read command file {}", path.display()))?;
    let command = Command::from_json(&content)
        .with_context(|| format!("Invalid command in {}", path.display()))?;

    let context = BuildContext::from_config(config).context("Invalid CRS definitions")?;
    let mut builder = LayerBuilder::new(LayerTree::new(), context);
    if builder.handle_command(command)? == CommandOutcome::Ignored {
        println!("Command ignored");
        return Ok(());
    }

    for layer in builder.target().layers() {
        let descriptor = layer.model.descriptor();
        println!("{} [{}] {}", layer.id, layer.layer_type, layer.label);
        println!("  {}: {}", descriptor.description, descriptor.source);

        let (Some(level), Some(provider)) = (level, layer.model.as_tile_provider()) else {
            continue;
        };
        let (columns, rows) = provider.level0_dimensions();
        for y in 0..tiles_at_level(rows, level) {
            for x in 0..tiles_at_level(columns, level) {
                if let Some(url) = provider.tile_url(&TileCoordinate::new(level, x, y)) {
                    println!("  {}/{}/{} {}", level, x, y, url);
                }
            }
        }
    }
    Ok(())
}
