// src/generator/carve.rs
// Room and corridor carving. All writes go through `Grid::carve`, so the
// border ring is never opened no matter what the caller passes in.

use crate::bsp::Rect;
use crate::map::{Grid, Pos};

/// Fills the rectangle `x1..x2` × `y1..y2` with floor.
pub fn carve_room(grid: &mut Grid, room: &Rect) {
    for y in room.y1.max(1)..room.y2.min(grid.height() - 1) {
        for x in room.x1.max(1)..room.x2.min(grid.width() - 1) {
            grid.carve(x, y);
        }
    }
}

/// Horizontal run from `x1` to `x2` (inclusive) centered on row `y`.
pub fn carve_h_tunnel(grid: &mut Grid, x1: i32, x2: i32, y: i32, width: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        for i in 0..width {
            grid.carve(x, y + i - width / 2);
        }
    }
}

/// Vertical run from `y1` to `y2` (inclusive) centered on column `x`.
pub fn carve_v_tunnel(grid: &mut Grid, y1: i32, y2: i32, x: i32, width: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        for i in 0..width {
            grid.carve(x + i - width / 2, y);
        }
    }
}

/// L-shaped corridor between two points. With `horizontal_first` the
/// elbow sits at `(to.x, from.y)`, otherwise at `(from.x, to.y)`.
pub fn carve_l_corridor(grid: &mut Grid, from: Pos, to: Pos, width: i32, horizontal_first: bool) {
    if horizontal_first {
        carve_h_tunnel(grid, from.x, to.x, from.y, width);
        carve_v_tunnel(grid, from.y, to.y, to.x, width);
    } else {
        carve_v_tunnel(grid, from.y, to.y, from.x, width);
        carve_h_tunnel(grid, from.x, to.x, to.y, width);
    }
}
