//! Direction encoding and the fixed-capacity 2-bit packed move buffer.

use thiserror::Error;

use crate::{MAX_PATH_LEN, PATH_BYTES};

/// The four unit moves, numbered so each fits in 2 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

/// All directions in flood-fill probe order.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    #[inline]
    pub fn from_bits(bits: u8) -> Direction {
        match bits & 0x3 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }

    /// (dx, dy) in grid coordinates; y grows downward.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
        }
    }

    #[inline]
    pub fn from_char(c: char) -> Option<Direction> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'R' => Some(Direction::Right),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            _ => None,
        }
    }
}

/// Appending beyond [`MAX_PATH_LEN`] moves is refused, never truncated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("encoded path is already at maximum length ({MAX_PATH_LEN} moves)")]
pub struct PathOverflow;

/// A move sequence packed 2 bits per direction into a fixed buffer.
///
/// Unused bits are always zero, so derived equality and hashing are
/// bit-exact over (length, bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedPath {
    len: u16,
    data: [u8; PATH_BYTES],
}

impl EncodedPath {
    pub const fn new() -> EncodedPath {
        EncodedPath {
            len: 0,
            data: [0u8; PATH_BYTES],
        }
    }

    /// Builds a path from direction characters; non-direction characters
    /// are rejected as `None`.
    pub fn from_str(s: &str) -> Option<EncodedPath> {
        let mut path = EncodedPath::new();
        for c in s.chars() {
            path.push(Direction::from_char(c)?).ok()?;
        }
        Some(path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, dir: Direction) -> Result<(), PathOverflow> {
        if self.len() >= MAX_PATH_LEN {
            return Err(PathOverflow);
        }
        let byte = self.len() / 4;
        let shift = (self.len() % 4) * 2;
        self.data[byte] |= (dir as u8) << shift;
        self.len += 1;
        Ok(())
    }

    #[inline]
    pub fn at(&self, i: usize) -> Direction {
        debug_assert!(i < self.len());
        let byte = i / 4;
        let shift = (i % 4) * 2;
        Direction::from_bits(self.data[byte] >> shift)
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        (0..self.len()).map(move |i| self.at(i))
    }
}

impl Default for EncodedPath {
    fn default() -> EncodedPath {
        EncodedPath::new()
    }
}

impl Ord for EncodedPath {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Length first, then packed bytes; cheap and deterministic.
        self.len
            .cmp(&other.len)
            .then_with(|| self.data.cmp(&other.data))
    }
}

impl PartialOrd for EncodedPath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for EncodedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for dir in self.iter() {
            write!(f, "{}", dir.to_char())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EncodedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodedPath({})", self)
    }
}
