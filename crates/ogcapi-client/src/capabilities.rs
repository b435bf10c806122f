//! Capabilities resolution: landing page, collections and their links.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ogc_common::{ConnectorError, ConnectorResult, CRS84_URI};
use ogcapi_protocol::{CollectionInfo, CollectionLinkType, CollectionList, LandingPage, Link};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::fetcher::{fetch_json, parse_url, HttpFetcher};

/// Base URL of a service, used to resolve relative link hrefs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerOptions {
    /// Service URL normalized to end with a slash, without query.
    pub base_url: Url,

    /// Links of the landing page, when the service has one.
    #[serde(default)]
    pub landing_links: Vec<Link>,
}

impl ServerOptions {
    pub fn new(service_url: &str) -> ConnectorResult<Self> {
        let mut base_url = parse_url(service_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(Self {
            base_url,
            landing_links: Vec::new(),
        })
    }

    /// Make `href` absolute. Absolute hrefs are returned untouched so URL
    /// templates keep their placeholders verbatim.
    pub fn complete(&self, href: &str) -> ConnectorResult<String> {
        if is_absolute(href) {
            return Ok(href.to_string());
        }
        let joined = self.base_url.join(href).map_err(|e| {
            ConnectorError::Parse(format!("Invalid link href '{}': {}", href, e))
        })?;
        Ok(joined
            .as_str()
            .replace("%7B", "{")
            .replace("%7D", "}"))
    }

    /// Resolve `href` to a URL that can be fetched.
    pub fn resolve(&self, href: &str) -> ConnectorResult<Url> {
        if is_absolute(href) {
            return parse_url(href);
        }
        self.base_url
            .join(href)
            .map_err(|e| ConnectorError::Parse(format!("Invalid link href '{}': {}", href, e)))
    }

    /// First landing-page link with relation `rel`.
    pub fn landing_link(&self, rel: &str) -> Option<&Link> {
        self.landing_links.iter().find(|l| l.has_rel(rel))
    }
}

fn is_absolute(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// A service's collections as fetched at `fetched_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesDocument {
    pub server: ServerOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub collections: Vec<Collection>,

    pub fetched_at: DateTime<Utc>,
}

impl CapabilitiesDocument {
    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }
}

/// A collection with absolute link hrefs and resolved CRS defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,

    /// Title, or the id when the server gives none.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Supported CRS URIs; CRS84 when the server lists none.
    pub crs: Vec<String>,

    /// Storage CRS, else the first supported CRS.
    pub default_reference: String,

    pub links: Vec<Link>,
}

impl Collection {
    pub fn from_info(info: CollectionInfo, server: &ServerOptions) -> ConnectorResult<Self> {
        let crs = match info.crs {
            Some(crs) if !crs.is_empty() => crs,
            _ => vec![CRS84_URI.to_string()],
        };
        let default_reference = info
            .storage_crs
            .clone()
            .unwrap_or_else(|| crs[0].clone());

        let links = info
            .links
            .into_iter()
            .map(|mut link| {
                link.href = server.complete(&link.href)?;
                Ok(link)
            })
            .collect::<ConnectorResult<Vec<Link>>>()?;

        Ok(Self {
            name: info.title.unwrap_or_else(|| info.id.clone()),
            id: info.id,
            description: info.description,
            crs,
            default_reference,
            links,
        })
    }

    /// Links carrying one of `link_type`'s relations, in document order.
    pub fn links_of(&self, link_type: CollectionLinkType) -> Vec<&Link> {
        self.links.iter().filter(|l| link_type.matches(l)).collect()
    }

    pub fn has_link_type(&self, link_type: CollectionLinkType) -> bool {
        self.links.iter().any(|l| link_type.matches(l))
    }
}

/// Order-preserving filter of `links` down to `relation_type`'s relations.
pub fn filter_collection_links(links: &[Link], relation_type: CollectionLinkType) -> Vec<Link> {
    links
        .iter()
        .filter(|l| relation_type.matches(l))
        .cloned()
        .collect()
}

/// Options for a capabilities fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitiesOptions {
    /// Drop collections without at least one link of this type.
    pub filter_collections_by_link_type: Option<CollectionLinkType>,
}

impl CapabilitiesOptions {
    pub fn filtered_by(link_type: CollectionLinkType) -> Self {
        Self {
            filter_collections_by_link_type: Some(link_type),
        }
    }
}

/// Fetches and normalizes a service's capabilities.
#[derive(Clone)]
pub struct CapabilitiesResolver {
    fetcher: Arc<dyn HttpFetcher>,
}

impl CapabilitiesResolver {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch the capabilities of the service at `url`.
    ///
    /// `url` may point at a landing page, in which case its `data` link
    /// (else `<url>/collections`) is followed, or directly at a collection
    /// list.
    #[instrument(skip(self, options), fields(url = %url))]
    pub async fn from_url(
        &self,
        url: &str,
        options: CapabilitiesOptions,
    ) -> ConnectorResult<CapabilitiesDocument> {
        let mut server = ServerOptions::new(url)?;
        let service_url = parse_url(url)?;

        let root: Value = fetch_json(self.fetcher.as_ref(), &service_url, "capabilities").await?;

        let (title, list) = if root.get("collections").is_some() {
            let list: CollectionList = serde_json::from_value(root)?;
            (None, list)
        } else {
            let landing: LandingPage = serde_json::from_value(root)?;
            let data_href = landing
                .data_link()
                .map(|l| l.href.clone())
                .unwrap_or_else(|| "collections".to_string());
            let data_url = server.resolve(&data_href)?;
            debug!(url = %data_url, "Following landing page data link");

            let list: CollectionList =
                fetch_json(self.fetcher.as_ref(), &data_url, "collections").await?;
            server.landing_links = landing.links;
            (landing.title, list)
        };

        let total = list.collections.len();
        let mut collections = Vec::with_capacity(total);
        for info in list.collections {
            let collection = Collection::from_info(info, &server)?;
            if let Some(link_type) = options.filter_collections_by_link_type {
                if !collection.has_link_type(link_type) {
                    debug!(
                        collection = %collection.id,
                        link_type = %link_type,
                        "Dropping collection without matching link"
                    );
                    continue;
                }
            }
            collections.push(collection);
        }

        info!(
            total = total,
            kept = collections.len(),
            "Resolved service capabilities"
        );

        Ok(CapabilitiesDocument {
            server,
            title,
            collections,
            fetched_at: Utc::now(),
        })
    }
}
