// src/map/mod.rs
pub mod grid;
pub mod tile;

pub use grid::{Grid, Pos, CARDINALS};
pub use tile::Tile;
