//! Coordinate Reference System tools.
//!
//! OGC API servers advertise CRSs as URIs
//! (`http://www.opengis.net/def/crs/EPSG/0/3857`), URNs
//! (`urn:ogc:def:crs:EPSG::3857`) or bare codes (`EPSG:3857`). Everything
//! downstream works with the canonical identifiers produced by
//! [`get_reference_name`] (`EPSG:<code>` or `CRS:84`).

use std::collections::{BTreeSet, HashMap};

use crate::{BoundingBox, ConnectorError, ConnectorResult};

/// OGC URI of the WGS84 lon/lat CRS.
pub const CRS84_URI: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";

/// Canonical identifier of the WGS84 lon/lat CRS.
pub const CRS84: &str = "CRS:84";

/// CRSs whose servers expect swapped (lat, lon) bounding boxes.
pub const DEFAULT_REVERSED_AXIS_CRS: &[&str] = &["EPSG:4269"];

const OGC_CRS_PATH: &str = "www.opengis.net/def/crs/";

const WEB_MERCATOR_EXTENT: f64 = 20037508.342789244;

/// Map an OGC CRS URI, URN or code to its canonical reference identifier.
///
/// Accepts formats like:
/// - "http://www.opengis.net/def/crs/OGC/1.3/CRS84"
/// - "https://www.opengis.net/def/crs/EPSG/0/4326"
/// - "urn:ogc:def:crs:EPSG::3857"
/// - "EPSG:4326", "epsg:4326"
/// - "CRS:84", "CRS84"
pub fn get_reference_name(crs: &str) -> ConnectorResult<String> {
    let unknown = || ConnectorError::UnknownCrs(crs.to_string());
    let lower = crs.trim().to_ascii_lowercase();

    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    if let Some(rest) = without_scheme {
        let path = rest.strip_prefix(OGC_CRS_PATH).ok_or_else(unknown)?;
        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
        return match segments.as_slice() {
            [authority, _version, code] => canonical_name(authority, code).ok_or_else(unknown),
            _ => Err(unknown()),
        };
    }

    if let Some(rest) = lower.strip_prefix("urn:ogc:def:crs:") {
        let segments: Vec<&str> = rest.split(':').collect();
        return match segments.as_slice() {
            [authority, _, code] | [authority, code] => {
                canonical_name(authority, code).ok_or_else(unknown)
            }
            _ => Err(unknown()),
        };
    }

    if matches!(lower.as_str(), "crs84" | "crs84h") {
        return Ok(CRS84.to_string());
    }

    match lower.split_once(':') {
        Some((authority, code)) => canonical_name(authority, code).ok_or_else(unknown),
        None => Err(unknown()),
    }
}

fn canonical_name(authority: &str, code: &str) -> Option<String> {
    match authority {
        "epsg" if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("EPSG:{}", code))
        }
        "ogc" | "crs" if matches!(code, "84" | "crs84" | "crs84h") => Some(CRS84.to_string()),
        _ => None,
    }
}

/// Check a reference identifier against the default reversed-axis allow-list.
pub fn is_reversed_axis_order(reference_id: &str) -> bool {
    let id = canonical_or_raw(reference_id);
    DEFAULT_REVERSED_AXIS_CRS.iter().any(|r| *r == id)
}

fn canonical_or_raw(id: &str) -> String {
    get_reference_name(id).unwrap_or_else(|_| id.trim().to_string())
}

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    XY,
    /// Y (latitude/northing), X (longitude/easting)
    LatLon,
}

/// Configurable allow-list of CRSs that need swapped bounding boxes.
///
/// This is deliberately a fixed list rather than the reference's own axis
/// metadata: several servers advertise EPSG:4326 yet expect lon/lat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisOrderPolicy {
    reversed: BTreeSet<String>,
}

impl Default for AxisOrderPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REVERSED_AXIS_CRS.iter().copied())
    }
}

impl AxisOrderPolicy {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            reversed: identifiers
                .into_iter()
                .map(|id| canonical_or_raw(id.as_ref()))
                .collect(),
        }
    }

    /// Membership test against the allow-list.
    pub fn is_reversed_axis_order(&self, reference_id: &str) -> bool {
        self.reversed.contains(&canonical_or_raw(reference_id))
    }
}

/// A resolved coordinate reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub identifier: String,
    /// Valid bounds in x/y order.
    pub bounds: BoundingBox,
    pub geographic: bool,
    /// Authority axis order.
    pub axis_order: AxisOrder,
    /// Definition for references registered at runtime.
    pub wkt: Option<String>,
}

impl Reference {
    fn builtin(identifier: &str, bounds: BoundingBox, geographic: bool, axis_order: AxisOrder) -> Self {
        Self {
            identifier: identifier.to_string(),
            bounds,
            geographic,
            axis_order,
            wkt: None,
        }
    }
}

/// Lookup table from canonical identifiers to references.
#[derive(Debug, Clone)]
pub struct CrsRegistry {
    references: HashMap<String, Reference>,
}

impl Default for CrsRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CrsRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            references: HashMap::new(),
        }
    }

    /// Registry pre-populated with the well-known CRSs.
    pub fn with_defaults() -> Self {
        let world = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
        let mercator = BoundingBox::new(
            -WEB_MERCATOR_EXTENT,
            -WEB_MERCATOR_EXTENT,
            WEB_MERCATOR_EXTENT,
            WEB_MERCATOR_EXTENT,
        );

        let mut registry = Self::empty();
        for reference in [
            Reference::builtin(CRS84, world, true, AxisOrder::XY),
            Reference::builtin("EPSG:4326", world, true, AxisOrder::LatLon),
            Reference::builtin("EPSG:4269", world, true, AxisOrder::LatLon),
            Reference::builtin("EPSG:3857", mercator, false, AxisOrder::XY),
            Reference::builtin("EPSG:900913", mercator, false, AxisOrder::XY),
            // World Mercator, clipped at ~80 degrees latitude
            Reference::builtin(
                "EPSG:3395",
                BoundingBox::new(
                    -WEB_MERCATOR_EXTENT,
                    -15496570.739723716,
                    WEB_MERCATOR_EXTENT,
                    18764656.231380403,
                ),
                false,
                AxisOrder::XY,
            ),
            // CONUS Albers Equal Area - approximate bounds in meters
            Reference::builtin(
                "EPSG:5070",
                BoundingBox::new(-2500000.0, -2500000.0, 2500000.0, 2500000.0),
                false,
                AxisOrder::XY,
            ),
            // Polar stereographic - approximate bounds
            Reference::builtin(
                "EPSG:3413",
                BoundingBox::new(-4000000.0, -4000000.0, 4000000.0, 4000000.0),
                false,
                AxisOrder::XY,
            ),
            Reference::builtin(
                "EPSG:3031",
                BoundingBox::new(-4000000.0, -4000000.0, 4000000.0, 4000000.0),
                false,
                AxisOrder::XY,
            ),
        ] {
            registry.insert(reference);
        }
        registry
    }

    /// Add or replace a reference.
    pub fn insert(&mut self, reference: Reference) {
        self.references
            .insert(reference.identifier.clone(), reference);
    }

    /// Pre-register a non-standard CRS from its well-known text.
    ///
    /// Bounds come from `bounds` when given, otherwise from a WKT2
    /// `BBOX[south,west,north,east]` clause of a geographic definition.
    pub fn register_wkt(
        &mut self,
        identifier: &str,
        wkt: &str,
        bounds: Option<BoundingBox>,
    ) -> ConnectorResult<&Reference> {
        let id = canonical_or_raw(identifier);
        let upper = wkt.trim_start().to_ascii_uppercase();
        let geographic = ["GEOGCS", "GEOGCRS", "GEODCRS", "GEOGRAPHICCRS"]
            .iter()
            .any(|keyword| upper.starts_with(keyword));

        let bounds = match bounds {
            Some(bounds) => bounds,
            None if geographic => parse_wkt_bbox(wkt).ok_or_else(|| {
                ConnectorError::Config(format!("No bounds in WKT definition of {}", id))
            })?,
            None => {
                return Err(ConnectorError::Config(format!(
                    "Projected CRS {} needs explicit bounds",
                    id
                )))
            }
        };

        let axis_order = if geographic && first_axis_is_latitude(&upper) {
            AxisOrder::LatLon
        } else {
            AxisOrder::XY
        };

        self.insert(Reference {
            identifier: id.clone(),
            bounds,
            geographic,
            axis_order,
            wkt: Some(wkt.to_string()),
        });
        self.get_reference(&id)
    }

    /// Look up a reference by identifier, URI or URN.
    pub fn get_reference(&self, crs: &str) -> ConnectorResult<&Reference> {
        self.references
            .get(&canonical_or_raw(crs))
            .ok_or_else(|| ConnectorError::UnknownCrs(crs.to_string()))
    }

    pub fn contains(&self, crs: &str) -> bool {
        self.get_reference(crs).is_ok()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// `BBOX[south,west,north,east]` → x/y bounding box.
fn parse_wkt_bbox(wkt: &str) -> Option<BoundingBox> {
    let upper = wkt.to_ascii_uppercase();
    let start = upper.find("BBOX[")? + "BBOX[".len();
    let end = start + upper[start..].find(']')?;
    let values: Vec<f64> = wkt[start..end]
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [south, west, north, east] => Some(BoundingBox::new(*west, *south, *east, *north)),
        _ => None,
    }
}

fn first_axis_is_latitude(upper_wkt: &str) -> bool {
    upper_wkt
        .find("AXIS[")
        .map(|start| {
            let axis = &upper_wkt[start..];
            let axis = &axis[..axis.find(']').unwrap_or(axis.len())];
            axis.contains("LAT") || axis.contains("NORTH")
        })
        .unwrap_or(false)
}
