//! Tile coordinates and tile-pyramid arithmetic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A tile coordinate (level/x/y) as requested by a renderer.
///
/// Request-time only; rows count from the bottom of the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoordinate {
    /// Zoom level
    pub level: u32,
    /// Column
    pub x: u64,
    /// Row
    pub y: u64,
}

impl TileCoordinate {
    pub fn new(level: u32, x: u64, y: u64) -> Self {
        Self { level, x, y }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}

/// Number of tiles along one axis at `level` of a quad-tree pyramid whose
/// root level has `level0` tiles along that axis.
pub fn tiles_at_level(level0: u64, level: u32) -> u64 {
    level0.saturating_mul(1u64.checked_shl(level).unwrap_or(u64::MAX))
}

/// Which corner of a tile matrix row/column numbering starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CornerOfOrigin {
    #[default]
    TopLeft,
    BottomLeft,
}

impl CornerOfOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            CornerOfOrigin::TopLeft => "topLeft",
            CornerOfOrigin::BottomLeft => "bottomLeft",
        }
    }
}

impl FromStr for CornerOfOrigin {
    type Err = String;

    /// Case-insensitive: servers send "topLeft", "TOPLEFT" and "top-left".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "TOPLEFT" => Ok(CornerOfOrigin::TopLeft),
            "BOTTOMLEFT" => Ok(CornerOfOrigin::BottomLeft),
            _ => Err(format!("Unknown corner of origin: {}", s)),
        }
    }
}

impl Serialize for CornerOfOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CornerOfOrigin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Quad-tree compatibility of a list of (matrix_width, matrix_height) pairs,
/// ordered from the coarsest level.
///
/// Returns:
/// - `0` when the dimensions double at every level and the first level is
///   an integer root that cannot be halved further (1x1, 2x1, 1x2, 3x3 ...)
/// - `k > 0` when the dimensions double but the first level could be halved
///   `k` more times, i.e. the pyramid is missing its top `k` levels
/// - `-1` when the dimensions do not double between successive levels, a
///   dimension is zero, or there are no levels at all
pub fn quad_tree_level_offset(dimensions: &[(u64, u64)]) -> i32 {
    let Some(&(root_width, root_height)) = dimensions.first() else {
        return -1;
    };
    if root_width == 0 || root_height == 0 {
        return -1;
    }

    let doubles = dimensions.windows(2).all(|pair| {
        let (coarse, fine) = (pair[0], pair[1]);
        coarse.0.checked_mul(2) == Some(fine.0) && coarse.1.checked_mul(2) == Some(fine.1)
    });
    if !doubles {
        return -1;
    }

    let (mut width, mut height, mut offset) = (root_width, root_height, 0);
    while width % 2 == 0 && height % 2 == 0 {
        width /= 2;
        height /= 2;
        offset += 1;
    }
    offset
}
