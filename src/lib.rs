//! Optimal solver for Boxed In style puzzles: a player walks a small bounded
//! grid, pushes boxes, collects gears, holds floor switches open with boxes
//! and finally steps onto the exit. The solver runs A* over compact
//! bit-packed states and returns a minimum-length move sequence, or reports
//! failure when no solution exists within the configured cost ceiling.

pub mod actions;
pub mod heuristic;
pub mod io;
pub mod level;
pub mod path;
pub mod search;
pub mod state;

pub use actions::{find_actions, Action};
pub use heuristic::Heuristic;
pub use level::{CharGrid, Level, LevelError, MoveError, Point};
pub use path::{Direction, EncodedPath, PathOverflow};
pub use search::{solve, SearchResult};
pub use state::{BoxBits, GearBits, Node, StateKey};

/// Cost type for g/h/f scores, measured in unit moves.
pub type Cost = u16;

/// Sentinel: table entry not yet computed.
pub const COST_UNKNOWN: Cost = Cost::MAX - 1;
/// Sentinel: no path exists.
pub const COST_INFINITY: Cost = Cost::MAX;

/// Hard ceiling on the number of gears a level may contain. Gear occupancy
/// is a single `u16` bitfield, so this is a compile-time limit.
pub const MAX_GEARS: usize = 16;

/// Hard ceiling on level size in tiles; box occupancy is a fixed array of
/// `BOX_WORDS` 64-bit words, one bit per tile.
pub const BOX_WORDS: usize = 3;
pub const MAX_TILES: usize = BOX_WORDS * 64;

/// Maximum encodable path length in moves (2 bits per move).
pub const MAX_PATH_LEN: usize = 256;
pub const PATH_BYTES: usize = MAX_PATH_LEN / 4;

/// Search cost ceiling: states whose f-score reaches this bound are dropped
/// with a warning instead of explored. A level whose optimal solution is
/// longer than this is reported unsolvable; known, accepted limitation.
pub const MAX_FSCORE: usize = 200;

/// Number of superseded-but-unreclaimed open entries that triggers a
/// physical sweep of the f-score buckets.
pub const SWEEP_THRESHOLD: u64 = 1_000_000;
