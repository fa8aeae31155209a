// src/bsp/mod.rs
pub mod bsp_node;
pub mod bsp_util;

pub use bsp_node::PartitionNode;
pub use bsp_util::{BoundingBox, Rect, ROOM_MARGIN};
