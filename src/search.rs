//! A* driver. All search state lives in a per-invocation `Search` context:
//! a node arena addressed by `NodeId`, an f-indexed bucket queue with an
//! upward-only cursor, and rustc-hash side indexes for the open and closed
//! sets. Stale open entries are flagged, not removed, and swept in batches.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::actions::find_actions;
use crate::heuristic::Heuristic;
use crate::level::{Level, Point, BOX, VOID, WALL};
use crate::path::Direction;
use crate::state::{Node, NodeId, StateKey};
use crate::{Cost, COST_INFINITY, MAX_FSCORE, SWEEP_THRESHOLD};

/// Outcome and statistics of a solver run.
pub struct SearchResult {
    pub success: bool,
    pub moves: Vec<Direction>,
    pub open_size: usize,
    pub closed_size: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn solution(&self) -> String {
        self.moves.iter().map(|d| d.to_char()).collect()
    }
}

#[inline]
fn seals(c: u8) -> bool {
    c == WALL || c == VOID || c == BOX
}

/// True when the exit or any remaining gear is walled off on all four
/// orthogonal sides by wall, void or box, with at least three of the four
/// diagonals also sealed. Out-of-bounds neighbors never count as sealing,
/// so a border tile is never reported dead.
fn is_dead_end(level: &Level, node: &Node) -> bool {
    let grid = level.state_map(node, true);
    let mut targets: Vec<Point> = level
        .gears
        .iter()
        .enumerate()
        .filter(|&(i, _)| node.gears.remaining(i))
        .map(|(_, &p)| p)
        .collect();
    targets.push(level.exit);

    for p in targets {
        let sealed_at = |dx: i32, dy: i32| -> bool {
            let x = p.x as i32 + dx;
            let y = p.y as i32 + dy;
            if x < 0 || y < 0 || x >= level.width as i32 || y >= level.height as i32 {
                return false;
            }
            seals(grid.at(Point::new(x as u8, y as u8)))
        };
        let orth = [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .iter()
            .filter(|&&(dx, dy)| sealed_at(dx, dy))
            .count();
        if orth < 4 {
            continue;
        }
        let diag = [(-1, -1), (1, -1), (-1, 1), (1, 1)]
            .iter()
            .filter(|&&(dx, dy)| sealed_at(dx, dy))
            .count();
        if diag >= 3 {
            return true;
        }
    }
    false
}

struct Search<'a> {
    level: &'a Level,
    heuristic: Heuristic<'a>,
    arena: Vec<Node>,
    buckets: Vec<VecDeque<NodeId>>,
    /// Lowest possibly non-empty bucket. Repaired h never lets a child's
    /// f drop below its parent's, so the cursor only moves up.
    cursor: usize,
    open: FxHashMap<StateKey, NodeId>,
    closed: FxHashSet<StateKey>,
    supersessions: u64,
    warned_fscore: bool,
}

impl<'a> Search<'a> {
    fn new(level: &'a Level) -> Search<'a> {
        Search {
            level,
            heuristic: Heuristic::new(level),
            arena: Vec::new(),
            buckets: (0..MAX_FSCORE).map(|_| VecDeque::new()).collect(),
            cursor: 0,
            open: FxHashMap::default(),
            closed: FxHashSet::default(),
            supersessions: 0,
            warned_fscore: false,
        }
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.arena.len() as NodeId;
        let f = node.f() as usize;
        debug_assert!(f >= self.cursor);
        self.arena.push(node);
        self.buckets[f].push_back(id);
        id
    }

    /// Next live node in f-order, skipping flagged entries. Skipped entries
    /// are gone for good, so a flagged node costs one extra loop iteration
    /// at most.
    fn pop(&mut self) -> Option<NodeId> {
        while self.cursor < MAX_FSCORE {
            while let Some(id) = self.buckets[self.cursor].pop_front() {
                if !self.arena[id as usize].superseded {
                    return Some(id);
                }
            }
            self.cursor += 1;
        }
        None
    }

    /// Batched removal of flagged entries from every bucket at or above
    /// the cursor. Arena slots are never reclaimed.
    fn sweep(&mut self) {
        let arena = &self.arena;
        for bucket in self.buckets[self.cursor..].iter_mut() {
            bucket.retain(|&id| !arena[id as usize].superseded);
        }
        eprintln!("sweep: dropped {} superseded open nodes", self.supersessions);
        self.supersessions = 0;
    }

    fn reconstruct(&self, goal: NodeId) -> Vec<Direction> {
        let mut chain = Vec::new();
        let mut cur = Some(goal);
        while let Some(id) = cur {
            chain.push(id);
            cur = self.arena[id as usize].parent;
        }
        let mut moves = Vec::new();
        for &id in chain.iter().rev() {
            moves.extend(self.arena[id as usize].path.iter());
        }
        moves
    }

    fn result(&self, success: bool, moves: Vec<Direction>, started: Instant) -> SearchResult {
        SearchResult {
            success,
            moves,
            open_size: self.open.len(),
            closed_size: self.closed.len(),
            elapsed: started.elapsed(),
        }
    }

    fn run(&mut self) -> SearchResult {
        let started = Instant::now();

        let mut start = Node::start_unscored(self.level);
        start.h = self
            .heuristic
            .estimate(self.level.tile_index(start.player), start.gears);
        if start.h == COST_INFINITY || (start.f() as usize) >= MAX_FSCORE {
            return self.result(false, Vec::new(), started);
        }
        let start_id = self.push_node(start);
        self.open.insert(start.key(), start_id);

        while let Some(id) = self.pop() {
            let node = self.arena[id as usize];
            let key = node.key();
            self.open.remove(&key);

            if node.is_goal(self.level) {
                let moves = self.reconstruct(id);
                return self.result(true, moves, started);
            }
            self.closed.insert(key);

            if is_dead_end(self.level, &node) {
                continue;
            }

            for action in find_actions(self.level, &node) {
                let mut child = Node::successor(self.level, id, &node, action.path, action.point);
                let child_key = child.key();
                if self.closed.contains(&child_key) {
                    continue;
                }

                let steps = child.path.len() as Cost;
                let raw = self
                    .heuristic
                    .estimate(self.level.tile_index(child.player), child.gears);
                // The raw estimate is admissible but not consistent; lift it
                // to the parent's score minus the steps taken so f never
                // decreases along an edge.
                child.h = raw.max(node.h.saturating_sub(steps));

                let f = child.f() as usize;
                if f >= MAX_FSCORE {
                    if !self.warned_fscore {
                        eprintln!("warning: dropping nodes with f >= {}", MAX_FSCORE);
                        self.warned_fscore = true;
                    }
                    continue;
                }

                match self.open.get(&child_key) {
                    Some(&other_id) => {
                        let other = &mut self.arena[other_id as usize];
                        if child.g < other.g {
                            other.superseded = true;
                            self.supersessions += 1;
                            let child_id = self.push_node(child);
                            self.open.insert(child_key, child_id);
                        }
                    }
                    None => {
                        let child_id = self.push_node(child);
                        self.open.insert(child_key, child_id);
                    }
                }
            }

            if self.supersessions > SWEEP_THRESHOLD {
                self.sweep();
            }
        }

        self.result(false, Vec::new(), started)
    }
}

/// Runs A* over the level and returns the optimal solution if one exists
/// within the f-score ceiling.
pub fn solve(level: &Level) -> SearchResult {
    Search::new(level).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_gear_is_a_dead_end() {
        let level = Level::parse(
            "\
xxxxx
xp@ x
x  +x
xx+*x
xxxxx",
        )
        .unwrap();
        let start = Node::start_unscored(&level);
        assert!(is_dead_end(&level, &start));
    }

    #[test]
    fn border_tiles_are_never_dead() {
        // Exit in the grid corner with walls on both in-bounds sides.
        // Out-of-bounds neighbors must not count as sealing.
        let level = Level::parse("@x\nxp").unwrap();
        let start = Node::start_unscored(&level);
        assert!(!is_dead_end(&level, &start));
    }

    #[test]
    fn solves_open_level_optimally() {
        let level = Level::parse(
            "\
xxxxxxx
xp  * x
x     x
x    @x
xxxxxxx",
        )
        .unwrap();
        let result = solve(&level);
        assert!(result.success);
        assert_eq!(result.num_moves(), 6);
        assert!(result.closed_size >= 1);
    }

    #[test]
    fn reports_failure_on_sealed_level() {
        let level = Level::parse(
            "\
xxxxx
xp@ x
x  +x
xx+*x
xxxxx",
        )
        .unwrap();
        let result = solve(&level);
        assert!(!result.success);
        assert!(result.moves.is_empty());
    }
}
