// src/generator/cellular.rs
//! Cellular automata caves, plain and seeded.
//!
//! Both variants start from border-walled noise and run the 4-5 rule over
//! the 8 neighbors of each tile: a floor tile closes up at five or more
//! wall neighbors, a wall tile opens up at four or fewer.

use log::debug;
use rand::Rng;

use crate::bsp::Rect;
use crate::config::LayoutParams;
use crate::error::ConfigError;
use crate::generator::carve::carve_room;
use crate::generator::postprocess::remove_isolated_areas;
use crate::map::Grid;

/// Wall neighbors at which a floor tile closes up.
pub const CLOSE_AT: usize = 5;
/// Wall neighbors at or below which a wall tile opens up.
pub const OPEN_AT: usize = 4;

pub const SEEDED_WALL_PROBABILITY: f64 = 0.58;
pub const SEEDED_ITERATIONS: u32 = 5;

pub fn generate_automata<R: Rng + ?Sized>(layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
    let (width, height) = layout.require_map_size()?;
    let params = layout.require_cellular_params()?;
    debug!(
        "cellular_automata: p={} iterations={} birth={} death={}",
        params.initial_wall_probability, params.iterations, params.birth_limit, params.death_limit
    );

    let mut grid = noise(width, height, params.initial_wall_probability, rng);
    for _ in 0..params.iterations {
        grid = step(&grid);
    }
    remove_isolated_areas(&mut grid);
    Ok(grid)
}

/// Noise at a fixed wall probability with floor seeds stamped in before the
/// automaton runs.
pub fn generate_rooms<R: Rng + ?Sized>(layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
    let (width, height) = layout.require_map_size()?;

    let mut grid = noise(width, height, SEEDED_WALL_PROBABILITY, rng);
    let seeds = seed_rooms(width, height, rng);
    for seed in &seeds {
        carve_room(&mut grid, seed);
    }
    debug!("cellular_rooms: {} seeds", seeds.len());

    for _ in 0..SEEDED_ITERATIONS {
        grid = step(&grid);
    }
    remove_isolated_areas(&mut grid);
    Ok(grid)
}

/// 4-7 squares of side 3-5 anchored in the middle half of the map.
fn seed_rooms<R: Rng + ?Sized>(width: i32, height: i32, rng: &mut R) -> Vec<Rect> {
    let count = rng.random_range(4..=7);
    (0..count)
        .map(|_| {
            let x = rng.random_range(width / 4..=3 * width / 4);
            let y = rng.random_range(height / 4..=3 * height / 4);
            let size = rng.random_range(3..=5);
            Rect::new(x, y, size, size)
        })
        .collect()
}

fn noise<R: Rng + ?Sized>(width: i32, height: i32, wall_probability: f64, rng: &mut R) -> Grid {
    let mut grid = Grid::new(width, height);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if rng.random::<f64>() >= wall_probability {
                grid.carve(x, y);
            }
        }
    }
    grid
}

/// One synchronous automaton pass. The border ring is never touched.
fn step(source: &Grid) -> Grid {
    let mut next = source.clone();
    for y in 1..source.height() - 1 {
        for x in 1..source.width() - 1 {
            let walls = source.wall_neighbors8(x, y);
            if source.is_floor(x, y) {
                if walls >= CLOSE_AT {
                    next.fill(x, y);
                }
            } else if walls <= OPEN_AT {
                next.carve(x, y);
            }
        }
    }
    next
}
