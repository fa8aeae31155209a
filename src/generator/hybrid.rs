// src/generator/hybrid.rs
//! Structured rooms joined by organic passages.
//!
//! A shallow BSP places centered rooms in each partition; consecutive rooms
//! are then linked by a biased drunkard walk instead of straight corridors.

use log::debug;
use rand::Rng;

use crate::bsp::{PartitionNode, Rect};
use crate::config::LayoutParams;
use crate::error::ConfigError;
use crate::generator::carve::carve_room;
use crate::generator::postprocess::remove_isolated_areas;
use crate::map::{Grid, Pos, CARDINALS};

pub const HYBRID_DEPTH: usize = 3;
pub const HYBRID_MIN_PARTITION: i32 = 10;
/// Chance a passage step heads toward its target rather than wandering.
pub const TOWARD_TARGET_BIAS: f64 = 0.7;
/// A passage ends once it is this close to the target on both axes.
pub const ARRIVAL_RADIUS: i32 = 2;

pub fn generate<R: Rng + ?Sized>(layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
    let (width, height) = layout.require_map_size()?;

    let mut grid = Grid::new(width, height);
    let mut root = PartitionNode::new(Rect::new(1, 1, width - 2, height - 2));
    root.split_to_depth(HYBRID_DEPTH, HYBRID_MIN_PARTITION, rng);

    let mut rooms = Vec::new();
    for leaf in root.leaves_mut() {
        let room = centered_room(&leaf.rect, rng);
        carve_room(&mut grid, &room);
        leaf.room = Some(room);
        rooms.push(room);
    }
    debug!("hybrid_rooms_caves: {} rooms", rooms.len());

    let max_steps = grid.area();
    for pair in rooms.windows(2) {
        wander_between(&mut grid, pair[0].center(), pair[1].center(), max_steps, rng);
    }

    remove_isolated_areas(&mut grid);
    Ok(grid)
}

/// A room 60-75% of the partition on each axis, centered in it.
fn centered_room<R: Rng + ?Sized>(rect: &Rect, rng: &mut R) -> Rect {
    let (w, h) = (rect.width(), rect.height());
    let room_w = rng.random_range(w * 3 / 5..=(w * 3 / 4).max(w * 3 / 5)).max(1);
    let room_h = rng.random_range(h * 3 / 5..=(h * 3 / 4).max(h * 3 / 5)).max(1);
    Rect::new(rect.x1 + (w - room_w) / 2, rect.y1 + (h - room_h) / 2, room_w, room_h)
}

/// Carves a meandering passage from `from` toward `to`, giving up after
/// `max_steps` steps.
fn wander_between<R: Rng + ?Sized>(grid: &mut Grid, from: Pos, to: Pos, max_steps: usize, rng: &mut R) {
    let mut current = from;
    for _ in 0..max_steps {
        grid.carve(current.x, current.y);
        if (current.x - to.x).abs() <= ARRIVAL_RADIUS && (current.y - to.y).abs() <= ARRIVAL_RADIUS {
            return;
        }

        let dx = (to.x - current.x).signum();
        let dy = (to.y - current.y).signum();
        let next = if rng.random::<f64>() < TOWARD_TARGET_BIAS && (dx != 0 || dy != 0) {
            if dx != 0 && dy != 0 {
                if rng.random_bool(0.5) {
                    current.offset(dx, 0)
                } else {
                    current.offset(0, dy)
                }
            } else {
                current.offset(dx, dy)
            }
        } else {
            let (wx, wy) = CARDINALS[rng.random_range(0..CARDINALS.len())];
            current.offset(wx, wy)
        };

        if grid.is_interior(next) {
            current = next;
        }
    }
}
