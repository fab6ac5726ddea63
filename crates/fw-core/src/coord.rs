use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute tile position in the world grid.
///
/// `x` and `z` address a tile on the horizontal plane; `level` selects the
/// height plane the tile sits on. Tiles are the unit the collision overlay
/// operates on; zones group tiles into coarser cells for spatial indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// West-to-east tile position.
    pub x: i32,
    /// South-to-north tile position.
    pub z: i32,
    /// Height plane, 0 being ground level.
    pub level: u8,
}

impl Coord {
    /// Create a coordinate from its parts.
    pub const fn new(x: i32, z: i32, level: u8) -> Self {
        Self { x, z, level }
    }

    /// Return this coordinate shifted by the given tile deltas on the same level.
    pub const fn translate(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
            level: self.level,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.z, self.level)
    }
}
