//! Common types and utilities shared across the OGC API connector crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod tile;

pub use bbox::BoundingBox;
pub use crs::{
    get_reference_name, is_reversed_axis_order, AxisOrder, AxisOrderPolicy, CrsRegistry,
    Reference, CRS84_URI,
};
pub use error::{ConnectorError, ConnectorResult};
pub use tile::{quad_tree_level_offset, tiles_at_level, CornerOfOrigin, TileCoordinate};
