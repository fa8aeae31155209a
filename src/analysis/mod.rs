// src/analysis/mod.rs
//! Structural analysis of a finished grid: rooms, hop distances from a
//! start tile, and dead ends. Everything here reads the grid and never
//! writes to it.

use std::collections::VecDeque;

use crate::bsp::BoundingBox;
use crate::error::AnalysisError;
use crate::map::{Grid, Pos, CARDINALS};

/// Components smaller than this are not reported as rooms.
pub const MIN_ROOM_TILES: usize = 4;

/// A 4-connected group of floor tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Tiles in flood-fill visiting order.
    pub tiles: Vec<Pos>,
    pub size: usize,
    /// Mean of the tile coordinates, truncated.
    pub center: Pos,
    pub bounds: BoundingBox,
}

impl Room {
    fn from_tiles(tiles: Vec<Pos>) -> Self {
        let n = tiles.len() as i64;
        let sum_x: i64 = tiles.iter().map(|p| i64::from(p.x)).sum();
        let sum_y: i64 = tiles.iter().map(|p| i64::from(p.y)).sum();
        let center = Pos::new((sum_x / n) as i32, (sum_y / n) as i32);
        let bounds = BoundingBox::from_points(&tiles);
        Room {
            size: tiles.len(),
            tiles,
            center,
            bounds,
        }
    }
}

fn flood_fill(grid: &Grid, start: Pos, visited: &mut [bool]) -> Vec<Pos> {
    let width = grid.width();
    let mut tiles = Vec::new();
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        if !grid.contains(pos) || !grid.is_floor(pos.x, pos.y) {
            continue;
        }
        let i = (pos.y * width + pos.x) as usize;
        if visited[i] {
            continue;
        }
        visited[i] = true;
        tiles.push(pos);
        stack.extend([pos.offset(1, 0), pos.offset(-1, 0), pos.offset(0, 1), pos.offset(0, -1)]);
    }
    tiles
}

/// Every connected floor component of at least [`MIN_ROOM_TILES`] tiles,
/// in the scan order of each component's first tile.
pub fn find_rooms(grid: &Grid) -> Vec<Room> {
    let mut visited = vec![false; grid.area()];
    let mut rooms = Vec::new();
    for pos in grid.floor_positions() {
        if visited[(pos.y * grid.width() + pos.x) as usize] {
            continue;
        }
        let tiles = flood_fill(grid, pos, &mut visited);
        if tiles.len() >= MIN_ROOM_TILES {
            rooms.push(Room::from_tiles(tiles));
        }
    }
    rooms
}

/// Hop distances from a start tile to every floor tile reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    start: Pos,
    width: i32,
    /// Reached tiles in breadth-first discovery order.
    order: Vec<(Pos, u32)>,
    lookup: Vec<Option<u32>>,
}

impl DistanceField {
    /// Breadth-first search over floor tiles. A wall or out-of-bounds start
    /// yields an empty field.
    pub fn build(grid: &Grid, start: Pos) -> Self {
        let width = grid.width();
        let mut lookup = vec![None; grid.area()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        if grid.contains(start) && grid.is_floor(start.x, start.y) {
            lookup[(start.y * width + start.x) as usize] = Some(0);
            queue.push_back((start, 0u32));
        }

        while let Some((pos, dist)) = queue.pop_front() {
            order.push((pos, dist));
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let next = pos.offset(dx, dy);
                if !grid.contains(next) || !grid.is_floor(next.x, next.y) {
                    continue;
                }
                let slot = &mut lookup[(next.y * width + next.x) as usize];
                if slot.is_none() {
                    *slot = Some(dist + 1);
                    queue.push_back((next, dist + 1));
                }
            }
        }

        DistanceField {
            start,
            width,
            order,
            lookup,
        }
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn get(&self, pos: Pos) -> Option<u32> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width {
            return None;
        }
        self.lookup
            .get((pos.y * self.width + pos.x) as usize)
            .copied()
            .flatten()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(tile, distance)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, u32)> + '_ {
        self.order.iter().copied()
    }

    pub fn max_distance(&self) -> u32 {
        self.order.last().map_or(0, |(_, d)| *d)
    }

    /// All reached tiles, furthest first; equal distances keep discovery order.
    pub fn furthest_first(&self) -> Vec<(Pos, u32)> {
        let mut sorted = self.order.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// Interior floor tiles with exactly one floor neighbor, in scan order.
pub fn find_dead_ends(grid: &Grid) -> Vec<Pos> {
    grid.floor_positions()
        .filter(|p| grid.is_interior(*p))
        .filter(|p| {
            CARDINALS
                .iter()
                .filter(|(dx, dy)| grid.is_floor(p.x + dx, p.y + dy))
                .count()
                == 1
        })
        .collect()
}

/// Everything the objective placer needs to know about a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelAnalysis {
    /// First floor tile in row-major scan order.
    pub start: Pos,
    pub rooms: Vec<Room>,
    pub distances: DistanceField,
    pub dead_ends: Vec<Pos>,
}

impl LevelAnalysis {
    /// Runs room detection, the distance field from the first floor tile,
    /// and dead-end detection.
    pub fn run(grid: &Grid) -> Result<Self, AnalysisError> {
        let start = grid.first_floor().ok_or(AnalysisError::NoFloorTiles)?;
        Ok(LevelAnalysis {
            start,
            rooms: find_rooms(grid),
            distances: DistanceField::build(grid, start),
            dead_ends: find_dead_ends(grid),
        })
    }
}
