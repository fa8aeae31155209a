// src/generator/postprocess.rs
// Passes applied to a finished grid: connectivity pruning, cave smoothing
// and pillar insertion.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::map::{Grid, Pos};

/// Chance that a qualifying open block receives a pillar.
pub const PILLAR_CHANCE: f64 = 0.4;
/// Floor tiles (out of 25) that make a 5×5 block "large and open".
pub const PILLAR_MIN_OPEN: usize = 20;

/// Groups floor tiles into 4-connected regions.
///
/// Returns, for every region, its tiles in row-major order. Regions are
/// ordered by their first tile in scan order.
fn floor_regions(grid: &Grid) -> Vec<Vec<Pos>> {
    let width = grid.width();
    let mut uf = QuickUnionUf::<UnionBySize>::new(grid.area());
    let key = |x: i32, y: i32| (y * width + x) as usize;

    for pos in grid.floor_positions() {
        if grid.is_floor(pos.x + 1, pos.y) {
            uf.union(key(pos.x, pos.y), key(pos.x + 1, pos.y));
        }
        if grid.is_floor(pos.x, pos.y + 1) {
            uf.union(key(pos.x, pos.y), key(pos.x, pos.y + 1));
        }
    }

    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
    let mut regions: Vec<Vec<Pos>> = Vec::new();
    for pos in grid.floor_positions() {
        let root = uf.find(key(pos.x, pos.y));
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            regions.push(Vec::new());
            regions.len() - 1
        });
        regions[slot].push(pos);
    }
    regions
}

/// Number of 4-connected floor regions.
pub fn floor_region_count(grid: &Grid) -> usize {
    floor_regions(grid).len()
}

/// Keeps only the largest 4-connected floor region; every other floor tile
/// becomes wall. On a size tie the region found first in scan order wins.
pub fn remove_isolated_areas(grid: &mut Grid) {
    let regions = floor_regions(grid);
    if regions.len() < 2 {
        return;
    }

    let mut keep = 0;
    for (i, region) in regions.iter().enumerate() {
        if region.len() > regions[keep].len() {
            keep = i;
        }
    }

    let mut pruned = 0;
    for (i, region) in regions.iter().enumerate() {
        if i == keep {
            continue;
        }
        for pos in region {
            grid.fill(pos.x, pos.y);
            pruned += 1;
        }
    }
    debug!(
        "pruned {} isolated regions ({} tiles), kept {} tiles",
        regions.len() - 1,
        pruned,
        regions[keep].len()
    );
}

/// Majority smoothing over the 8-neighborhood: ≥5 wall neighbors makes a
/// wall, ≤3 makes a floor, exactly 4 leaves the tile as it was.
pub fn smooth_cave(grid: &mut Grid, iterations: usize) {
    for _ in 0..iterations {
        let source = grid.clone();
        for y in 1..grid.height() - 1 {
            for x in 1..grid.width() - 1 {
                let walls = source.wall_neighbors8(x, y);
                if walls >= 5 {
                    grid.fill(x, y);
                } else if walls <= 3 {
                    grid.carve(x, y);
                }
            }
        }
    }
}

/// Breaks up big open areas with 2×2 pillars.
///
/// Candidate centers sit on a 4-tile lattice starting at (3, 3); a center
/// whose 5×5 block holds at least [`PILLAR_MIN_OPEN`] floor tiles gets a
/// pillar with probability [`PILLAR_CHANCE`].
pub fn add_pillars<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let mut placed = 0;
    for y in (3..grid.height() - 3).step_by(4) {
        for x in (3..grid.width() - 3).step_by(4) {
            let mut open = 0;
            for dy in -2..=2 {
                for dx in -2..=2 {
                    if grid.is_floor(x + dx, y + dy) {
                        open += 1;
                    }
                }
            }
            if open >= PILLAR_MIN_OPEN && rng.random_bool(PILLAR_CHANCE) {
                for dy in 0..2 {
                    for dx in 0..2 {
                        grid.fill(x + dx, y + dy);
                    }
                }
                placed += 1;
            }
        }
    }
    debug!("placed {} pillars", placed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::carve::carve_room;
    use crate::bsp::Rect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_remove_isolated_keeps_largest() {
        let mut grid = Grid::from_ascii(
            "
            ##########
            #..#.....#
            #..#.....#
            ####.....#
            #.########
            ##########
            ",
        );
        assert_eq!(floor_region_count(&grid), 3);
        remove_isolated_areas(&mut grid);
        assert_eq!(floor_region_count(&grid), 1);
        assert_eq!(grid.floor_count(), 15);
        assert!(grid.is_floor(4, 1));
        assert!(!grid.is_floor(1, 1));
    }

    #[test]
    fn test_winding_region_is_one_region() {
        // The three columns only meet along the bottom row.
        let grid = Grid::from_ascii(
            "
            #######
            #.#.#.#
            #.#.#.#
            #.....#
            #######
            ",
        );
        assert_eq!(floor_region_count(&grid), 1);
        assert_eq!(floor_regions(&grid)[0].len(), 11);
    }

    #[test]
    fn test_remove_isolated_tie_keeps_first() {
        let mut grid = Grid::from_ascii(
            "
            #######
            #..#..#
            #######
            ",
        );
        remove_isolated_areas(&mut grid);
        assert!(grid.is_floor(1, 1));
        assert!(!grid.is_floor(4, 1));
    }

    #[test]
    fn test_remove_isolated_on_empty_grid_is_noop() {
        let mut grid = Grid::new(8, 8);
        remove_isolated_areas(&mut grid);
        assert_eq!(grid.floor_count(), 0);
    }

    #[test]
    fn test_smooth_fills_lone_floor_and_opens_lone_wall() {
        let mut grid = Grid::new(9, 9);
        grid.carve(4, 4);
        smooth_cave(&mut grid, 1);
        assert_eq!(grid.floor_count(), 0);

        let mut grid = Grid::new(9, 9);
        carve_room(&mut grid, &Rect::new(1, 1, 7, 7));
        grid.fill(4, 4);
        smooth_cave(&mut grid, 1);
        assert!(grid.is_floor(4, 4));
        assert!(grid.is_border_all_wall());
    }

    #[test]
    fn test_pillars_only_in_open_areas() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut closed = Grid::new(30, 30);
        add_pillars(&mut closed, &mut rng);
        assert_eq!(closed.floor_count(), 0);

        let mut open = Grid::new(30, 30);
        carve_room(&mut open, &Rect::new(1, 1, 28, 28));
        let before = open.floor_count();
        for _ in 0..5 {
            add_pillars(&mut open, &mut rng);
        }
        assert!(open.floor_count() < before);
        assert_eq!((before - open.floor_count()) % 4, 0);
        assert!(open.is_border_all_wall());
    }
}
