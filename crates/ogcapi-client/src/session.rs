//! State of one connection to a service.
//!
//! A connection goes through "fetch capabilities", "select collection",
//! "fetch tile matrix sets" and "select tile matrix set". Fetches are
//! asynchronous and a user may start a new one before the previous one
//! completes, so every fetch is issued a [`FetchTicket`] and its result is
//! applied only while that ticket is the latest of its kind.

use ogc_common::{ConnectorError, ConnectorResult};
use ogcapi_protocol::TileSetData;
use tracing::{debug, warn};

use crate::capabilities::{
    CapabilitiesDocument, CapabilitiesOptions, CapabilitiesResolver, Collection,
};
use crate::tilesets::TileMatrixSetResolver;

/// What a ticket was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Capabilities,
    TileSets,
}

/// Proof of a started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    kind: FetchKind,
    generation: u64,
}

impl FetchTicket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// Result of handing a completed fetch to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer fetch of the same kind was started; the result was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct ConnectionSession {
    capabilities_generation: u64,
    tile_sets_generation: u64,
    service_url: Option<String>,
    capabilities: Option<CapabilitiesDocument>,
    tile_sets: Vec<TileSetData>,
    selected_collection: Option<String>,
    selected_tile_set: Option<String>,
}

impl ConnectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a capabilities fetch for `service_url`.
    ///
    /// Invalidates any capabilities or tile set fetch still in flight.
    pub fn begin_capabilities_fetch(&mut self, service_url: &str) -> FetchTicket {
        self.capabilities_generation += 1;
        self.tile_sets_generation += 1;
        self.service_url = Some(service_url.to_string());
        FetchTicket {
            kind: FetchKind::Capabilities,
            generation: self.capabilities_generation,
        }
    }

    /// Start a tile matrix set fetch for the current capabilities.
    pub fn begin_tile_sets_fetch(&mut self) -> FetchTicket {
        self.tile_sets_generation += 1;
        FetchTicket {
            kind: FetchKind::TileSets,
            generation: self.tile_sets_generation,
        }
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        let latest = match ticket.kind {
            FetchKind::Capabilities => self.capabilities_generation,
            FetchKind::TileSets => self.tile_sets_generation,
        };
        ticket.generation == latest
    }

    /// Apply a completed capabilities fetch.
    ///
    /// A failed fetch keeps the previously held document and returns the
    /// error; a stale one (or one completed with a ticket of another kind)
    /// is dropped whatever its result.
    pub fn complete_capabilities_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ConnectorResult<CapabilitiesDocument>,
    ) -> ConnectorResult<ApplyOutcome> {
        if ticket.kind != FetchKind::Capabilities || !self.is_current(ticket) {
            debug!(generation = ticket.generation, "Dropping stale capabilities fetch");
            return Ok(ApplyOutcome::Stale);
        }

        match result {
            Ok(document) => {
                self.capabilities = Some(document);
                self.tile_sets.clear();
                self.selected_collection = None;
                self.selected_tile_set = None;
                Ok(ApplyOutcome::Applied)
            }
            Err(e) => {
                warn!(error = %e, "Capabilities fetch failed, keeping previous state");
                Err(e)
            }
        }
    }

    /// Apply a completed tile matrix set fetch.
    pub fn complete_tile_sets_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ConnectorResult<Vec<TileSetData>>,
    ) -> ConnectorResult<ApplyOutcome> {
        if ticket.kind != FetchKind::TileSets || !self.is_current(ticket) {
            debug!(generation = ticket.generation, "Dropping stale tile set fetch");
            return Ok(ApplyOutcome::Stale);
        }

        match result {
            Ok(sets) => {
                self.tile_sets = sets;
                self.selected_tile_set = None;
                Ok(ApplyOutcome::Applied)
            }
            Err(e) => {
                warn!(error = %e, "Tile set fetch failed, keeping previous state");
                Err(e)
            }
        }
    }

    /// Fetch and apply capabilities in one step.
    pub async fn connect(
        &mut self,
        resolver: &CapabilitiesResolver,
        service_url: &str,
        options: CapabilitiesOptions,
    ) -> ConnectorResult<ApplyOutcome> {
        let ticket = self.begin_capabilities_fetch(service_url);
        let result = resolver.from_url(service_url, options).await;
        self.complete_capabilities_fetch(ticket, result)
    }

    /// Fetch and apply the quad-tree compatible tile matrix sets.
    pub async fn load_tile_sets(
        &mut self,
        resolver: &TileMatrixSetResolver,
    ) -> ConnectorResult<ApplyOutcome> {
        let Some(document) = self.capabilities.clone() else {
            return Err(ConnectorError::MissingCapabilities(
                "connect to a service before loading tile matrix sets".to_string(),
            ));
        };
        let ticket = self.begin_tile_sets_fetch();
        let result = resolver.selectable_tile_sets(&document).await;
        self.complete_tile_sets_fetch(ticket, result)
    }

    pub fn service_url(&self) -> Option<&str> {
        self.service_url.as_deref()
    }

    pub fn capabilities(&self) -> Option<&CapabilitiesDocument> {
        self.capabilities.as_ref()
    }

    pub fn tile_sets(&self) -> &[TileSetData] {
        &self.tile_sets
    }

    /// Select a collection of the current capabilities by id.
    pub fn select_collection(&mut self, id: &str) -> Option<&Collection> {
        let found = self
            .capabilities
            .as_ref()
            .and_then(|doc| doc.collection(id))
            .is_some();
        if !found {
            return None;
        }
        self.selected_collection = Some(id.to_string());
        self.selected_collection()
    }

    pub fn selected_collection(&self) -> Option<&Collection> {
        let id = self.selected_collection.as_deref()?;
        self.capabilities.as_ref()?.collection(id)
    }

    /// Select a loaded tile matrix set by id.
    pub fn select_tile_set(&mut self, id: &str) -> Option<&TileSetData> {
        if !self.tile_sets.iter().any(|s| s.id == id) {
            return None;
        }
        self.selected_tile_set = Some(id.to_string());
        self.selected_tile_set()
    }

    pub fn selected_tile_set(&self) -> Option<&TileSetData> {
        let id = self.selected_tile_set.as_deref()?;
        self.tile_sets.iter().find(|s| s.id == id)
    }
}
