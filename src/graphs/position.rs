use serde::{Deserialize, Serialize};

/// Location of a star system in axial hex coordinates.
///
/// The implicit third axis is `s = -q - r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexPosition {
    pub q: i32,
    pub r: i32,
}

impl HexPosition {
    pub fn new(q: i32, r: i32) -> HexPosition {
        HexPosition { q, r }
    }

    /// Converts an offset (column, row) pair into axial coordinates.
    pub fn from_offset(column: i32, row: i32) -> HexPosition {
        let q = column;
        let q_offset = (q + (q & 1)).div_euclid(2);
        HexPosition { q, r: row - q_offset }
    }

    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Number of hex steps (parsecs) between two positions.
    pub fn distance(&self, other: &HexPosition) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }
}
