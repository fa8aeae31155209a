//! src/bsp/bsp_node.rs

use std::collections::VecDeque;

use rand::Rng;

use crate::bsp::Rect;

/// Aspect ratio at which a partition is always cut across its long axis.
pub const FORCED_SPLIT_RATIO: f64 = 1.25;

/// A node in the space-partition tree. Each node has:
/// - the `rect` of map space it covers,
/// - either two children (`left`, `right`) or none,
/// - a `room` once it has been furnished (leaves only).
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    pub rect: Rect,
    pub room: Option<Rect>,
    pub left: Option<Box<PartitionNode>>,
    pub right: Option<Box<PartitionNode>>,
}

impl PartitionNode {
    pub fn new(rect: Rect) -> Self {
        PartitionNode {
            rect,
            room: None,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Cuts this node in two. Returns `false` (and stays a leaf) when it is
    /// already split or when either half would come out smaller than `min_size`.
    pub fn split<R: Rng + ?Sized>(&mut self, min_size: i32, rng: &mut R) -> bool {
        if !self.is_leaf() {
            return false;
        }

        let width = self.rect.width();
        let height = self.rect.height();
        if width <= 0 || height <= 0 {
            return false;
        }

        // Horizontal means the cut line runs along x, stacking top and bottom halves.
        let split_horizontally = if width > height && f64::from(width) / f64::from(height) >= FORCED_SPLIT_RATIO {
            false
        } else if height > width && f64::from(height) / f64::from(width) >= FORCED_SPLIT_RATIO {
            true
        } else {
            rng.random_bool(0.5)
        };

        let extent = if split_horizontally { height } else { width };
        let max_split = extent - min_size;
        if max_split <= min_size {
            return false;
        }
        let split_pos = rng.random_range(min_size..=max_split);

        let Rect { x1, y1, .. } = self.rect;
        let (left, right) = if split_horizontally {
            (
                Rect::new(x1, y1, width, split_pos),
                Rect::new(x1, y1 + split_pos, width, height - split_pos),
            )
        } else {
            (
                Rect::new(x1, y1, split_pos, height),
                Rect::new(x1 + split_pos, y1, width - split_pos, height),
            )
        };
        self.left = Some(Box::new(PartitionNode::new(left)));
        self.right = Some(Box::new(PartitionNode::new(right)));
        true
    }

    /// Splits level by level, at most `max_depth` levels below this node.
    pub fn split_to_depth<R: Rng + ?Sized>(&mut self, max_depth: usize, min_size: i32, rng: &mut R) {
        let mut frontier: Vec<&mut PartitionNode> = vec![self];
        for _ in 0..max_depth {
            let mut next = Vec::new();
            for node in frontier {
                if node.split(min_size, rng) {
                    let PartitionNode { left, right, .. } = node;
                    next.extend(left.as_deref_mut());
                    next.extend(right.as_deref_mut());
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
    }

    /// Leaves in breadth-first order (shallow leaves first, left before right).
    pub fn leaves_mut(&mut self) -> Vec<&mut PartitionNode> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            if node.is_leaf() {
                leaves.push(node);
                continue;
            }
            let PartitionNode { left, right, .. } = node;
            queue.extend(left.as_deref_mut());
            queue.extend(right.as_deref_mut());
        }
        leaves
    }

    /// First room found depth-first (this node, then left, then right).
    pub fn representative_room(&self) -> Option<Rect> {
        if let Some(room) = self.room {
            return Some(room);
        }
        self.left
            .as_deref()
            .and_then(PartitionNode::representative_room)
            .or_else(|| self.right.as_deref().and_then(PartitionNode::representative_room))
    }

    pub fn depth(&self) -> usize {
        let left = self.left.as_deref().map_or(0, PartitionNode::depth);
        let right = self.right.as_deref().map_or(0, PartitionNode::depth);
        if self.is_leaf() {
            0
        } else {
            1 + left.max(right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_wide_partition_splits_vertically() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut node = PartitionNode::new(Rect::new(1, 1, 60, 20));
        assert!(node.split(8, &mut rng));
        let left = node.left.as_ref().unwrap();
        let right = node.right.as_ref().unwrap();
        assert_eq!(left.rect.height(), 20);
        assert_eq!(right.rect.height(), 20);
        assert_eq!(left.rect.width() + right.rect.width(), 60);
        assert!(left.rect.width() >= 8 && right.rect.width() >= 8);
        assert_eq!(right.rect.x1, left.rect.x2);
    }

    #[test]
    fn test_tall_partition_splits_horizontally() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut node = PartitionNode::new(Rect::new(1, 1, 20, 40));
        assert!(node.split(8, &mut rng));
        let left = node.left.as_ref().unwrap();
        assert_eq!(left.rect.width(), 20);
        assert!(left.rect.height() >= 8 && left.rect.height() <= 32);
    }

    #[test]
    fn test_small_partition_stays_leaf() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut node = PartitionNode::new(Rect::new(0, 0, 16, 16));
        // 16 - 8 == 8 leaves an empty split range.
        assert!(!node.split(8, &mut rng));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_split_to_depth_respects_limit() {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut root = PartitionNode::new(Rect::new(1, 1, 78, 48));
            root.split_to_depth(4, 8, &mut rng);
            assert!(root.depth() <= 4);
            let leaves = root.leaves_mut();
            assert!(leaves.len() >= 2);
            let area: i32 = leaves.iter().map(|l| l.rect.width() * l.rect.height()).sum();
            assert_eq!(area, 78 * 48);
        }
    }

    #[test]
    fn test_representative_room_is_depth_first() {
        let mut root = PartitionNode::new(Rect::new(0, 0, 20, 10));
        let mut left = PartitionNode::new(Rect::new(0, 0, 10, 10));
        let mut right = PartitionNode::new(Rect::new(10, 0, 10, 10));
        left.room = Some(Rect::new(1, 1, 3, 3));
        right.room = Some(Rect::new(12, 1, 3, 3));
        root.left = Some(Box::new(left));
        root.right = Some(Box::new(right));
        assert_eq!(root.representative_room(), Some(Rect::new(1, 1, 3, 3)));
        assert_eq!(
            root.right.as_deref().unwrap().representative_room(),
            Some(Rect::new(12, 1, 3, 3))
        );
    }
}
