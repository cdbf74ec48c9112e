use serde::{Deserialize, Serialize};

/// A single map cell. The generator only distinguishes solid rock from
/// carved-out floor; doors, stairs, and terrain variants are the caller's
/// business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Tile::Floor)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Wall
    }
}
