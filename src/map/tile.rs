// src/map/tile.rs

use serde::{Deserialize, Serialize};

/// A single cell of a level grid.
///
/// On the wire a tile is the integer `0` (wall) or `1` (floor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tile {
    #[default]
    Wall,
    Floor,
}

impl Tile {
    pub fn is_floor(self) -> bool {
        self == Tile::Floor
    }

    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> u8 {
        match tile {
            Tile::Wall => 0,
            Tile::Floor => 1,
        }
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Tile::Wall),
            1 => Ok(Tile::Floor),
            other => Err(format!("invalid tile value {other}, expected 0 or 1")),
        }
    }
}
