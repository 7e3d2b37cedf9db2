//! Static level description and its display/search projections.
//!
//! A parsed [`Level`] is immutable for the search. The mutating move helpers
//! at the bottom exist for the solution viewer, which replays a move
//! sequence against a throwaway clone.

use arrayvec::ArrayVec;
use smallvec::SmallVec;
use thiserror::Error;

use crate::path::Direction;
use crate::state::Node;
use crate::{MAX_GEARS, MAX_TILES};

// Level alphabet.
pub const VOID: u8 = b'\'';
pub const FLOOR: u8 = b' ';
pub const WALL: u8 = b'x';
pub const BOX: u8 = b'+';
pub const GEAR: u8 = b'*';
pub const EXIT: u8 = b'@';
pub const PLAYER: u8 = b'p';
/// Reserved for the flood fill visited marker.
pub const FILLED: u8 = b'-';

/// Switch colors, lower case; the matching gate is the upper-case letter.
pub const SWITCH_CHARS: [u8; 6] = *b"roygbv";
const CASE_OFFSET: u8 = b'a' - b'A';

#[inline]
pub fn is_switch(c: u8) -> bool {
    SWITCH_CHARS.contains(&c)
}

#[inline]
pub fn is_gate(c: u8) -> bool {
    SWITCH_CHARS.contains(&c.wrapping_add(CASE_OFFSET))
}

/// Tiles the player can step onto during a flood fill.
#[inline]
pub fn is_walkable(c: u8) -> bool {
    c == FLOOR || c == GEAR || c == EXIT || is_switch(c)
}

/// Tiles a pushed box may land on. Never the exit or a gear.
#[inline]
pub fn is_box_target(c: u8) -> bool {
    c == FLOOR || c == FILLED || is_switch(c)
}

/// A tile coordinate; y grows downward, row-major tile numbering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Point {
        Point { x, y }
    }

    /// One step in `dir`, or `None` when that leaves the grid.
    #[inline]
    pub fn step(self, dir: Direction, width: usize, height: usize) -> Option<Point> {
        let (dx, dy) = dir.delta();
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if x < 0 || y < 0 || x >= width as i16 || y >= height as i16 {
            return None;
        }
        Some(Point::new(x as u8, y as u8))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A flat byte grid of level characters.
#[derive(Clone, PartialEq, Eq)]
pub struct CharGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<u8>,
}

impl CharGrid {
    #[inline]
    pub fn at(&self, p: Point) -> u8 {
        self.cells[p.y as usize * self.width + p.x as usize]
    }

    #[inline]
    pub fn set(&mut self, p: Point, c: u8) {
        self.cells[p.y as usize * self.width + p.x as usize] = c;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width)
    }
}

/// One switch/gate pair. While the switch tile is occupied by the player or
/// a box, the gate tile is open floor; otherwise the gate blocks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SwitchGate {
    pub color: u8,
    pub switch: Point,
    pub gate: Point,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LevelError {
    #[error("level is empty")]
    Empty,
    #[error("row {0} has a different length than the first row")]
    RaggedRow(usize),
    #[error("invalid character {c:?} at ({x},{y})")]
    InvalidChar { c: char, x: usize, y: usize },
    #[error("expected exactly 1 player tile, found {0}")]
    PlayerCount(usize),
    #[error("expected exactly 1 exit tile, found {0}")]
    ExitCount(usize),
    #[error("level has {0} gears, max supported is {MAX_GEARS}")]
    TooManyGears(usize),
    #[error("level has {0} tiles, max supported is {MAX_TILES}")]
    TooLarge(usize),
    #[error("switch/gate pair {0:?} is incomplete")]
    UnpairedSwitch(char),
}

/// Replaying a direction that is not legal in the current state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move {dir} from ({x},{y})")]
pub struct MoveError {
    pub x: u8,
    pub y: u8,
    pub dir: char,
}

/// Immutable puzzle description built once from the input character grid.
#[derive(Clone)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    /// Void, wall and floor only; every dynamic element becomes floor.
    pub floor_plan: Vec<u8>,
    pub player: Point,
    pub exit: Point,
    pub boxes: SmallVec<[Point; 20]>,
    /// Order fixes each gear's bit position.
    pub gears: ArrayVec<Point, MAX_GEARS>,
    pub switch_gates: ArrayVec<SwitchGate, 6>,
}

impl Level {
    pub fn parse(text: &str) -> Result<Level, LevelError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Err(LevelError::Empty);
        }
        let width = lines[0].len();
        let height = lines.len();
        if width == 0 {
            return Err(LevelError::Empty);
        }
        if width * height > MAX_TILES {
            return Err(LevelError::TooLarge(width * height));
        }

        let mut floor_plan = Vec::with_capacity(width * height);
        let mut players = 0usize;
        let mut exits = 0usize;
        let mut player = Point::new(0, 0);
        let mut exit = Point::new(0, 0);
        let mut boxes = SmallVec::new();
        let mut gears: Vec<Point> = Vec::new();
        let mut switches = [None::<Point>; 6];
        let mut gates = [None::<Point>; 6];

        for (y, line) in lines.iter().enumerate() {
            if line.len() != width {
                return Err(LevelError::RaggedRow(y));
            }
            for (x, c) in line.bytes().enumerate() {
                let p = Point::new(x as u8, y as u8);
                let floor = match c {
                    VOID | WALL => c,
                    FLOOR => FLOOR,
                    BOX => {
                        boxes.push(p);
                        FLOOR
                    }
                    GEAR => {
                        gears.push(p);
                        FLOOR
                    }
                    EXIT => {
                        exits += 1;
                        exit = p;
                        FLOOR
                    }
                    PLAYER => {
                        players += 1;
                        player = p;
                        FLOOR
                    }
                    c if is_switch(c) => {
                        let i = SWITCH_CHARS.iter().position(|&s| s == c).unwrap();
                        switches[i] = Some(p);
                        FLOOR
                    }
                    c if is_gate(c) => {
                        let i = SWITCH_CHARS
                            .iter()
                            .position(|&s| s == c.wrapping_add(CASE_OFFSET))
                            .unwrap();
                        gates[i] = Some(p);
                        FLOOR
                    }
                    _ => {
                        return Err(LevelError::InvalidChar { c: c as char, x, y });
                    }
                };
                floor_plan.push(floor);
            }
        }

        if players != 1 {
            return Err(LevelError::PlayerCount(players));
        }
        if exits != 1 {
            return Err(LevelError::ExitCount(exits));
        }
        if gears.len() > MAX_GEARS {
            return Err(LevelError::TooManyGears(gears.len()));
        }

        let mut switch_gates = ArrayVec::new();
        for i in 0..6 {
            match (switches[i], gates[i]) {
                (Some(switch), Some(gate)) => switch_gates.push(SwitchGate {
                    color: SWITCH_CHARS[i],
                    switch,
                    gate,
                }),
                (None, None) => {}
                _ => return Err(LevelError::UnpairedSwitch(SWITCH_CHARS[i] as char)),
            }
        }

        Ok(Level {
            width,
            height,
            floor_plan,
            player,
            exit,
            boxes,
            gears: gears.into_iter().collect(),
            switch_gates,
        })
    }

    #[inline]
    pub fn num_tiles(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn tile_index(&self, p: Point) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    #[inline]
    pub fn tile_point(&self, index: usize) -> Point {
        Point::new((index % self.width) as u8, (index / self.width) as u8)
    }

    pub fn gear_index(&self, p: Point) -> Option<usize> {
        self.gears.iter().position(|&g| g == p)
    }

    fn bare_grid(&self) -> CharGrid {
        CharGrid {
            width: self.width,
            height: self.height,
            cells: self.floor_plan.clone(),
        }
    }

    /// Overlays a search state onto the floor plan: boxes, remaining gears,
    /// optionally the player, the exit, then every switch/gate pair whose
    /// switch tile is still unoccupied. An occupied switch holds its gate
    /// open, so neither char is drawn and the gate tile stays floor.
    pub fn state_map(&self, node: &Node, draw_player: bool) -> CharGrid {
        let mut grid = self.bare_grid();
        for tile in 0..self.num_tiles() {
            if node.boxes.test(tile) {
                grid.set(self.tile_point(tile), BOX);
            }
        }
        for (i, &gear) in self.gears.iter().enumerate() {
            if node.gears.remaining(i) {
                grid.set(gear, GEAR);
            }
        }
        if draw_player {
            grid.set(node.player, PLAYER);
        }
        grid.set(self.exit, EXIT);
        for sg in &self.switch_gates {
            if grid.at(sg.switch) == FLOOR {
                grid.set(sg.switch, sg.color);
                grid.set(sg.gate, sg.color - CASE_OFFSET);
            }
        }
        grid
    }

    /// Display projection of the level's own (possibly replayed) positions.
    pub fn render(&self) -> CharGrid {
        let mut grid = self.bare_grid();
        for &b in &self.boxes {
            grid.set(b, BOX);
        }
        for &g in &self.gears {
            grid.set(g, GEAR);
        }
        grid.set(self.player, PLAYER);
        grid.set(self.exit, EXIT);
        for sg in &self.switch_gates {
            if grid.at(sg.switch) == FLOOR {
                grid.set(sg.switch, sg.color);
                grid.set(sg.gate, sg.color - CASE_OFFSET);
            }
        }
        grid
    }

    /// Is a unit move in `dir` legal from `from` on this projected grid?
    /// Covers plain walking and pushing an adjacent box one tile.
    pub fn can_move(grid: &CharGrid, from: Point, dir: Direction) -> bool {
        let Some(t1) = from.step(dir, grid.width, grid.height) else {
            return false;
        };
        let c1 = grid.at(t1);
        if is_walkable(c1) || c1 == FILLED {
            return true;
        }
        if c1 == BOX {
            if let Some(t2) = t1.step(dir, grid.width, grid.height) {
                return is_box_target(grid.at(t2));
            }
        }
        false
    }

    /// Moves the player one tile, pushing a box if one is there.
    /// Assumes the move is legal; no validation is performed.
    pub fn step(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        self.player.x = (self.player.x as i16 + dx as i16) as u8;
        self.player.y = (self.player.y as i16 + dy as i16) as u8;
        let player = self.player;
        if let Some(b) = self.boxes.iter_mut().find(|b| **b == player) {
            b.x = (b.x as i16 + dx as i16) as u8;
            b.y = (b.y as i16 + dy as i16) as u8;
        }
    }

    /// Removes the gear at the player's tile, if any.
    pub fn try_pickup_gear(&mut self) {
        let player = self.player;
        self.gears.retain(|&mut g| g != player);
    }

    pub fn gears_left(&self) -> usize {
        self.gears.len()
    }
}
