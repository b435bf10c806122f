//! Client side of the OGC API connector.
//!
//! Resolves a service's capabilities (landing page, collections and their
//! links), its tile matrix sets and per-collection tile links, and keeps the
//! state of one connection in an explicit [`ConnectionSession`].
//!
//! All network access goes through the [`HttpFetcher`] trait.
//! [`ReqwestFetcher`] is the production implementation; [`StaticFetcher`]
//! serves canned documents for tests and offline use.

pub mod capabilities;
pub mod config;
pub mod fetcher;
pub mod formats;
pub mod session;
pub mod tilesets;

pub use capabilities::{
    filter_collection_links, CapabilitiesDocument, CapabilitiesOptions, CapabilitiesResolver,
    Collection, ServerOptions,
};
pub use config::{ConnectorConfig, CrsDefinition};
pub use fetcher::{HttpFetcher, ReqwestFetcher, StaticFetcher};
pub use formats::{available_formats, select_format, FormatSelection};
pub use session::{ApplyOutcome, ConnectionSession, FetchKind, FetchTicket};
pub use tilesets::{TileMatrixSetResolver, TileSetMeta};
