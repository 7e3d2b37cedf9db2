//! Bit-packed search state: box occupancy, gear occupancy and the node
//! record the A* driver stores in its arena.

use crate::level::{Level, Point};
use crate::path::EncodedPath;
use crate::{Cost, BOX_WORDS};

/// Arena index of a node; predecessors are referenced by index, never by
/// pointer, so the arena's lifetime governs every node.
pub type NodeId = u32;

/// One bit per tile, row-major, sized for the largest supported level
/// rather than per level. Lexicographic word order gives a deterministic
/// total order for tie-breaking.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct BoxBits([u64; BOX_WORDS]);

impl BoxBits {
    pub fn from_tiles(tiles: impl IntoIterator<Item = usize>) -> BoxBits {
        let mut bits = BoxBits::default();
        for tile in tiles {
            bits.set(tile);
        }
        bits
    }

    #[inline]
    pub fn set(&mut self, tile: usize) {
        self.0[tile / 64] |= 1u64 << (tile % 64);
    }

    #[inline]
    pub fn clear(&mut self, tile: usize) {
        self.0[tile / 64] &= !(1u64 << (tile % 64));
    }

    #[inline]
    pub fn test(&self, tile: usize) -> bool {
        self.0[tile / 64] & (1u64 << (tile % 64)) != 0
    }

    /// Clear-and-set, used when a box is pushed one tile.
    #[inline]
    pub fn move_bit(&mut self, from: usize, to: usize) {
        self.clear(from);
        self.set(to);
    }
}

/// One bit per gear; bit=1 means the gear has not been collected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GearBits(pub u16);

impl GearBits {
    #[inline]
    pub fn all(count: usize) -> GearBits {
        debug_assert!(count <= 16);
        if count == 16 {
            GearBits(u16::MAX)
        } else {
            GearBits((1u16 << count) - 1)
        }
    }

    #[inline]
    pub fn collect(&mut self, index: usize) {
        self.0 &= !(1u16 << index);
    }

    #[inline]
    pub fn remaining(&self, index: usize) -> bool {
        self.0 & (1u16 << index) != 0
    }

    #[inline]
    pub fn none_remaining(&self) -> bool {
        self.0 == 0
    }
}

/// Deduplication identity: move history and g/h-costs are deliberately
/// excluded, so two routes to the same position compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateKey {
    pub player: Point,
    pub boxes: BoxBits,
    pub gears: GearBits,
}

/// One search state. `path` holds only the moves from the predecessor;
/// the full solution is reassembled by walking `parent` links after the
/// goal is popped.
#[derive(Clone, Copy)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub path: EncodedPath,
    pub player: Point,
    pub boxes: BoxBits,
    pub gears: GearBits,
    /// Lazy-deletion flag: a cheaper route to the same identity was found
    /// after this node was queued.
    pub superseded: bool,
    pub g: Cost,
    pub h: Cost,
}

impl Node {
    /// Start node with an unset heuristic; the driver scores it.
    pub fn start_unscored(level: &Level) -> Node {
        Node {
            parent: None,
            path: EncodedPath::new(),
            player: level.player,
            boxes: BoxBits::from_tiles(level.boxes.iter().map(|&b| level.tile_index(b))),
            gears: GearBits::all(level.gears.len()),
            superseded: false,
            g: 0,
            h: 0,
        }
    }

    /// Child state from applying an action: the player lands on the action
    /// point, any gear there is collected, and any box there is shoved one
    /// tile along the action's final move.
    pub fn successor(
        level: &Level,
        parent_id: NodeId,
        parent: &Node,
        path: EncodedPath,
        point: Point,
    ) -> Node {
        let mut node = Node {
            parent: Some(parent_id),
            path,
            player: point,
            boxes: parent.boxes,
            gears: parent.gears,
            superseded: false,
            g: parent.g + path.len() as Cost,
            h: 0,
        };
        if let Some(i) = level.gear_index(point) {
            node.gears.collect(i);
        }
        let tile = level.tile_index(point);
        if node.boxes.test(tile) {
            let dir = path.at(path.len() - 1);
            let dest = point
                .step(dir, level.width, level.height)
                .expect("push destination verified by the action generator");
            node.boxes.move_bit(tile, level.tile_index(dest));
        }
        node
    }

    #[inline]
    pub fn f(&self) -> Cost {
        self.g.saturating_add(self.h)
    }

    #[inline]
    pub fn key(&self) -> StateKey {
        StateKey {
            player: self.player,
            boxes: self.boxes,
            gears: self.gears,
        }
    }

    #[inline]
    pub fn is_goal(&self, level: &Level) -> bool {
        self.gears.none_remaining() && self.player == level.exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Direction;

    #[test]
    fn box_bits_set_clear_move() {
        let mut bits = BoxBits::default();
        bits.set(3);
        bits.set(70);
        bits.set(130);
        assert!(bits.test(3) && bits.test(70) && bits.test(130));
        bits.move_bit(70, 71);
        assert!(!bits.test(70) && bits.test(71));
        bits.clear(3);
        assert!(!bits.test(3));
    }

    #[test]
    fn box_bits_order_is_lexicographic_over_words() {
        let low = BoxBits::from_tiles([0]);
        let high = BoxBits::from_tiles([64]);
        // Word 0 dominates word 1.
        assert!(low > BoxBits::default());
        assert!(high > BoxBits::default());
        assert!(BoxBits::from_tiles([1, 64]) > BoxBits::from_tiles([0, 130]));
    }

    #[test]
    fn gear_bits_collect() {
        let mut gears = GearBits::all(3);
        assert_eq!(gears.0, 0b111);
        assert!(gears.remaining(1));
        gears.collect(1);
        assert!(!gears.remaining(1));
        gears.collect(0);
        gears.collect(2);
        assert!(gears.none_remaining());
        assert_eq!(GearBits::all(16).0, u16::MAX);
    }

    #[test]
    fn identity_ignores_history_and_costs() {
        let level = Level::parse("xxxx\nxp@x\nxxxx").unwrap();
        let a = Node::start_unscored(&level);
        let mut b = a;
        b.g = 7;
        b.h = 3;
        b.path = EncodedPath::from_str("UDUD").unwrap();
        b.parent = Some(42);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn successor_moves_box_and_collects_gear() {
        let level = Level::parse("xxxxxx\nxp+ *x\nx   @x\nxxxxxx").unwrap();
        let start = Node::start_unscored(&level);

        // Push the box right: player ends on the box's old tile.
        let push = EncodedPath::from_str("R").unwrap();
        let child = Node::successor(&level, 0, &start, push, Point::new(2, 1));
        assert_eq!(child.player, Point::new(2, 1));
        assert!(!child.boxes.test(level.tile_index(Point::new(2, 1))));
        assert!(child.boxes.test(level.tile_index(Point::new(3, 1))));
        assert_eq!(child.g, 1);
        assert_eq!(child.gears, start.gears);

        // Walk to the gear: bit cleared, boxes untouched.
        let walk = EncodedPath::from_str("DRRRU").unwrap();
        let child = Node::successor(&level, 0, &start, walk, Point::new(4, 1));
        assert!(child.gears.none_remaining());
        assert_eq!(child.boxes, start.boxes);
        assert_eq!(child.g, 5);
        assert!(!child.is_goal(&level));
    }
}
