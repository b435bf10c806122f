//! OGC API connector CLI.
//!
//! Inspects an OGC API service and builds tile URLs and layers from it.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ogcapi_protocol::CollectionLinkType;

#[derive(Parser, Debug)]
#[command(name = "ogcapi-connect")]
#[command(about = "Connect to OGC API Tiles, Maps and Features services", long_about = None)]
struct Cli {
    /// Connector configuration file
    #[arg(long, env = "OGCAPI_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the collections of a service
    Capabilities {
        /// Landing page or collections URL
        #[arg(short, long, env = "OGCAPI_URL")]
        url: String,

        /// Only collections with links of this type: items, tiles or map
        #[arg(short, long)]
        filter: Option<CollectionLinkType>,
    },

    /// List the tile matrix sets of a service
    Tilesets {
        #[arg(short, long, env = "OGCAPI_URL")]
        url: String,

        /// Include sets that are not quad-tree compatible
        #[arg(short, long)]
        all: bool,
    },

    /// Print the URL of one tile of a collection
    TileUrl {
        #[arg(short, long, env = "OGCAPI_URL")]
        url: String,

        /// Collection id
        #[arg(short, long)]
        collection: String,

        /// Tile matrix set id (tiles only)
        #[arg(short, long, default_value = "WebMercatorQuad")]
        tile_matrix_set: String,

        /// Use the collection's map endpoint instead of its tiles
        #[arg(long)]
        maps: bool,

        /// CRS for map requests, defaults to the collection's storage CRS
        #[arg(long)]
        crs: Option<String>,

        #[arg(short, long, default_value = "0")]
        level: u32,

        #[arg(short, default_value = "0")]
        x: u64,

        #[arg(short, default_value = "0")]
        y: u64,
    },

    /// Run a layer command file and print the layers it creates
    Build {
        /// Command JSON file
        #[arg(short = 'f', long)]
        command: PathBuf,

        /// Print the URLs of level `level` tiles of raster layers
        #[arg(short, long)]
        level: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr, results to stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    commands::run(cli.config.as_deref(), cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tile_url() {
        let cli = Cli::try_parse_from([
            "ogcapi-connect",
            "tile-url",
            "--url",
            "https://maps.example.com/ogcapi",
            "--collection",
            "blueMarble",
            "--level",
            "3",
            "-x",
            "5",
            "-y",
            "1",
        ])
        .unwrap();

        match cli.command {
            Commands::TileUrl {
                collection,
                tile_matrix_set,
                maps,
                level,
                x,
                y,
                ..
            } => {
                assert_eq!(collection, "blueMarble");
                assert_eq!(tile_matrix_set, "WebMercatorQuad");
                assert!(!maps);
                assert_eq!((level, x, y), (3, 5, 1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_capabilities_filter() {
        let cli = Cli::try_parse_from([
            "ogcapi-connect",
            "capabilities",
            "-u",
            "https://maps.example.com/ogcapi",
            "--filter",
            "maps",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Capabilities {
                filter: Some(CollectionLinkType::Map),
                ..
            }
        ));
    }
}
