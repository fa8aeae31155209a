// src/map/grid.rs

use serde::{Deserialize, Serialize};

use crate::map::Tile;

/// The four cardinal steps, in the order up, right, down, left.
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// An integer grid coordinate. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Pos::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Pos::new(x, y)
    }
}

impl From<Pos> for (i32, i32) {
    fn from(pos: Pos) -> Self {
        (pos.x, pos.y)
    }
}

/// Row-major `width × height` tile buffer.
///
/// All reads are bounds-checked: anything outside the grid reads as
/// [`Tile::Wall`]. Carving goes through [`Grid::carve`], which refuses to
/// touch the one-tile border ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// An all-wall grid. Non-positive dimensions give an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Grid {
            width,
            height,
            tiles: vec![Tile::Wall; width as usize * height as usize],
        }
    }

    /// Builds a grid from rows of `0`/`1` values (or any tile rows).
    pub fn from_rows(rows: &[Vec<Tile>]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.len() as i32);
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                grid.set(Pos::new(x as i32, y as i32), *tile);
            }
        }
        grid
    }

    /// Parses a picture where `.` is floor and anything else is wall.
    /// Leading/trailing blank lines and indentation are ignored.
    pub fn from_ascii(picture: &str) -> Self {
        let rows: Vec<Vec<Tile>> = picture
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| if c == '.' { Tile::Floor } else { Tile::Wall })
                    .collect()
            })
            .collect();
        Grid::from_rows(&rows)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos.x, pos.y).is_some()
    }

    /// True for cells strictly inside the border ring.
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x >= 1 && pos.x < self.width - 1 && pos.y >= 1 && pos.y < self.height - 1
    }

    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.index(pos.x, pos.y).map(|i| self.tiles[i])
    }

    /// Tile at `(x, y)`, with out-of-bounds treated as wall.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::Wall, |i| self.tiles[i])
    }

    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_floor()
    }

    /// Writes a tile anywhere inside the grid. Returns `false` when out of bounds.
    pub fn set(&mut self, pos: Pos, tile: Tile) -> bool {
        match self.index(pos.x, pos.y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Turns an interior cell into floor. Border and out-of-bounds cells are left alone.
    pub fn carve(&mut self, x: i32, y: i32) -> bool {
        let pos = Pos::new(x, y);
        if self.is_interior(pos) {
            self.set(pos, Tile::Floor)
        } else {
            false
        }
    }

    /// Turns an interior cell back into wall.
    pub fn fill(&mut self, x: i32, y: i32) -> bool {
        let pos = Pos::new(x, y);
        if self.is_interior(pos) {
            self.set(pos, Tile::Wall)
        } else {
            false
        }
    }

    /// Number of walls among the 8 neighbors; out-of-bounds counts as wall.
    pub fn wall_neighbors8(&self, x: i32, y: i32) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx != 0 || dy != 0) && self.tile(x + dx, y + dy).is_wall() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Number of walls among the 4 cardinal neighbors; out-of-bounds counts as wall.
    pub fn wall_neighbors4(&self, x: i32, y: i32) -> usize {
        CARDINALS
            .iter()
            .filter(|(dx, dy)| self.tile(x + dx, y + dy).is_wall())
            .count()
    }

    /// Floor coordinates in row-major scan order.
    pub fn floor_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.tiles.iter().enumerate().filter_map(move |(i, tile)| {
            tile.is_floor()
                .then(|| Pos::new(i as i32 % self.width, i as i32 / self.width))
        })
    }

    pub fn first_floor(&self) -> Option<Pos> {
        self.floor_positions().next()
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_floor()).count()
    }

    pub fn floor_fraction(&self) -> f64 {
        if self.tiles.is_empty() {
            0.0
        } else {
            self.floor_count() as f64 / self.tiles.len() as f64
        }
    }

    pub fn is_border_all_wall(&self) -> bool {
        (0..self.width).all(|x| self.tile(x, 0).is_wall() && self.tile(x, self.height - 1).is_wall())
            && (0..self.height)
                .all(|y| self.tile(0, y).is_wall() && self.tile(self.width - 1, y).is_wall())
    }

    /// Rows of `0` (wall) / `1` (floor), `height` rows of `width` values.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height as usize];
        }
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| u8::from(*t)).collect())
            .collect()
    }
}
