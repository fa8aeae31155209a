// src/bsp/bsp_util.rs
// Rectangle math shared by the room-based generators and the analyzer.

use serde::{Deserialize, Serialize};

use crate::map::Pos;

/// Gap (in tiles) that must separate two rooms.
pub const ROOM_MARGIN: i32 = 1;

/// Axis-aligned integer rectangle. `x2`/`y2` are exclusive, so a room
/// carved from it covers `x1..x2` × `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Pos {
        Pos::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Overlap test that also rejects rectangles closer than [`ROOM_MARGIN`].
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 + ROOM_MARGIN
            && self.x2 >= other.x1 - ROOM_MARGIN
            && self.y1 <= other.y2 + ROOM_MARGIN
            && self.y2 >= other.y1 - ROOM_MARGIN
    }

    /// Euclidean distance between the two centers.
    pub fn center_distance(&self, other: &Rect) -> f64 {
        let a = self.center();
        let b = other.center();
        let dx = f64::from(a.x - b.x);
        let dy = f64::from(a.y - b.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Inclusive integer bounds of a set of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub fn new_empty() -> Self {
        BoundingBox {
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        }
    }

    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Pos>) -> Self {
        let mut bbox = BoundingBox::new_empty();
        for p in points {
            bbox.expand_point(p.x, p.y);
        }
        bbox
    }

    pub fn expand_point(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}
