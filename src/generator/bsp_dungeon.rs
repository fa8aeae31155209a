// src/generator/bsp_dungeon.rs
//! Binary space partitioning dungeon.
//!
//! The map (minus its border) is split four levels deep, every leaf gets a
//! room covering half to nearly all of its partition, and sibling subtrees
//! are joined bottom-up by L-shaped corridors.

use log::debug;
use rand::Rng;

use crate::bsp::{PartitionNode, Rect};
use crate::config::LayoutParams;
use crate::error::ConfigError;
use crate::generator::carve::{carve_l_corridor, carve_room};
use crate::generator::postprocess::remove_isolated_areas;
use crate::map::Grid;

pub const BSP_DEPTH: usize = 4;
pub const BSP_MIN_PARTITION: i32 = 8;
const DEFAULT_CORRIDOR_WIDTH: i32 = 1;

pub fn generate<R: Rng + ?Sized>(layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
    let (width, height) = layout.require_map_size()?;
    let corridor_width = match layout.corridor_width {
        Some(_) => layout.require_corridor_width()?,
        None => DEFAULT_CORRIDOR_WIDTH,
    };

    let mut grid = Grid::new(width, height);
    let mut root = PartitionNode::new(Rect::new(1, 1, width - 2, height - 2));
    root.split_to_depth(BSP_DEPTH, BSP_MIN_PARTITION, rng);

    let depth = root.depth();
    let leaves = root.leaves_mut();
    debug!("bsp: {} leaves, tree depth {}", leaves.len(), depth);
    for leaf in leaves {
        let room = room_in_partition(&leaf.rect, rng);
        carve_room(&mut grid, &room);
        leaf.room = Some(room);
    }

    connect_siblings(&mut grid, &root, corridor_width, rng);
    remove_isolated_areas(&mut grid);
    Ok(grid)
}

/// A room 50-100% the size of `rect`, offset at least one tile from its
/// top-left edge.
fn room_in_partition<R: Rng + ?Sized>(rect: &Rect, rng: &mut R) -> Rect {
    let (w, h) = (rect.width(), rect.height());
    let room_w = rng.random_range(w / 2..=(w - 2).max(w / 2 + 1));
    let room_h = rng.random_range(h / 2..=(h - 2).max(h / 2 + 1));
    let room_x = rect.x1 + rng.random_range(1..=(w - room_w - 1).max(1));
    let room_y = rect.y1 + rng.random_range(1..=(h - room_h - 1).max(1));
    Rect::new(room_x, room_y, room_w, room_h)
}

/// Post-order: children are wired up first, then this node joins the
/// representative room of its left subtree to that of its right subtree.
fn connect_siblings<R: Rng + ?Sized>(grid: &mut Grid, node: &PartitionNode, corridor_width: i32, rng: &mut R) {
    let (Some(left), Some(right)) = (node.left.as_deref(), node.right.as_deref()) else {
        return;
    };
    connect_siblings(grid, left, corridor_width, rng);
    connect_siblings(grid, right, corridor_width, rng);

    if let (Some(a), Some(b)) = (left.representative_room(), right.representative_room()) {
        let horizontal_first = rng.random_bool(0.5);
        carve_l_corridor(grid, a.center(), b.center(), corridor_width, horizontal_first);
    }
}
