//! Walking-distance heuristic: an all-pairs tile distance table over the
//! static floor plan plus a memoized "through the remaining gears to the
//! exit" estimate. Admissible (boxes and gates are ignored, so the real
//! cost can only be higher) but not consistent; the driver repairs that.

use std::collections::VecDeque;

use crate::level::{Level, FLOOR};
use crate::state::GearBits;
use crate::{Cost, COST_INFINITY, COST_UNKNOWN};

/// Tile-to-tile cost table storing only one triangle, since
/// `dist(a,b) == dist(b,a)` and `dist(a,a) == 0`.
pub struct SymmetricCostTable {
    width: usize,
    table: Vec<Cost>,
}

impl SymmetricCostTable {
    pub fn new(width: usize) -> SymmetricCostTable {
        let mut table = SymmetricCostTable {
            width,
            table: vec![COST_UNKNOWN; width * (width + 1) / 2],
        };
        for i in 0..width {
            table.set(i, i, 0);
        }
        table
    }

    #[inline]
    fn offset(&self, mut a: usize, mut b: usize) -> usize {
        if b > a {
            std::mem::swap(&mut a, &mut b);
        }
        // Row-major rectangle offset minus the triangle above the diagonal.
        b * self.width + a - (b * (b + 1)) / 2
    }

    #[inline]
    pub fn get(&self, a: usize, b: usize) -> Cost {
        self.table[self.offset(a, b)]
    }

    #[inline]
    pub fn set(&mut self, a: usize, b: usize, cost: Cost) {
        let off = self.offset(a, b);
        self.table[off] = cost;
    }
}

/// The single concrete cost estimator: shortest walking distance from a
/// tile through some ordering of the remaining gears to the exit.
pub struct Heuristic<'a> {
    level: &'a Level,
    dist: SymmetricCostTable,
    /// Memo indexed by `tile * 2^num_gears + gear_bits`; exponential in the
    /// gear count, which is why entries are computed lazily.
    hscore: Vec<Cost>,
    num_gears: usize,
    exit_tile: usize,
}

impl<'a> Heuristic<'a> {
    pub fn new(level: &'a Level) -> Heuristic<'a> {
        let num_tiles = level.num_tiles();
        let num_gears = level.gears.len();
        Heuristic {
            level,
            dist: SymmetricCostTable::new(num_tiles),
            hscore: vec![COST_UNKNOWN; num_tiles << num_gears],
            num_gears,
            exit_tile: level.tile_index(level.exit),
        }
    }

    /// BFS walking distance between two tiles over walls only; memoized.
    /// `COST_INFINITY` when the floor plan itself disconnects them.
    pub fn cell_dist(&mut self, a: usize, b: usize) -> Cost {
        let known = self.dist.get(a, b);
        if known != COST_UNKNOWN {
            return known;
        }

        let width = self.level.width;
        let num_tiles = self.level.num_tiles();
        let mut cost = COST_INFINITY;
        let mut seen = vec![false; num_tiles];
        let mut queue: VecDeque<(usize, Cost)> = VecDeque::new();
        seen[a] = true;
        queue.push_back((a, 0));

        while let Some((tile, steps)) = queue.pop_front() {
            if tile == b {
                cost = steps;
                break;
            }
            let x = tile % width;
            let y = tile / width;
            let mut probe = |next: usize| {
                if !seen[next] && self.level.floor_plan[next] == FLOOR {
                    seen[next] = true;
                    queue.push_back((next, steps + 1));
                }
            };
            if y > 0 {
                probe(tile - width);
            }
            if tile + width < num_tiles {
                probe(tile + width);
            }
            if x > 0 {
                probe(tile - 1);
            }
            if x + 1 < width {
                probe(tile + 1);
            }
        }

        self.dist.set(a, b, cost);
        cost
    }

    /// Estimated moves from `tile` to the goal with `gears` outstanding.
    pub fn estimate(&mut self, tile: usize, gears: GearBits) -> Cost {
        let memo = tile * (1 << self.num_gears) + gears.0 as usize;
        let known = self.hscore[memo];
        if known != COST_UNKNOWN {
            return known;
        }

        let cost = if gears.none_remaining() {
            self.cell_dist(tile, self.exit_tile)
        } else {
            let mut best = COST_INFINITY;
            for i in 0..self.num_gears {
                if !gears.remaining(i) {
                    continue;
                }
                let gear_tile = self.level.tile_index(self.level.gears[i]);
                let mut rest = gears;
                rest.collect(i);
                let through = self
                    .cell_dist(tile, gear_tile)
                    .saturating_add(self.estimate(gear_tile, rest));
                best = best.min(through);
            }
            best
        };

        self.hscore[memo] = cost;
        cost
    }
}
