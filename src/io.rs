//! Terminal output and solution-file parsing.

use std::fmt;
use std::io::{self, Write};

use crate::level::{CharGrid, BOX, EXIT, GEAR, PLAYER};
use crate::path::Direction;
use crate::search::SearchResult;

const RESET: &str = "\x1b[0m";

/// Color per display char; entity and switch/gate chars only, everything
/// else prints plain.
fn color_code(c: u8) -> Option<&'static str> {
    match c {
        BOX => Some("\x1b[33m"),
        PLAYER => Some("\x1b[36m"),
        EXIT => Some("\x1b[35m"),
        GEAR => Some("\x1b[97m"),
        b'r' | b'R' => Some("\x1b[31m"),
        b'o' | b'O' => Some("\x1b[91m"),
        b'y' | b'Y' => Some("\x1b[93m"),
        b'g' | b'G' => Some("\x1b[32m"),
        b'b' | b'B' => Some("\x1b[34m"),
        b'v' | b'V' => Some("\x1b[95m"),
        _ => None,
    }
}

pub fn print_grid<W: Write>(out: &mut W, grid: &CharGrid, color: bool) -> io::Result<()> {
    for row in grid.rows() {
        for &c in row {
            match color_code(c).filter(|_| color) {
                Some(code) => write!(out, "{}{}{}", code, c as char, RESET)?,
                None => write!(out, "{}", c as char)?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Extracts the move sequence from a solution file. Direction letters are
/// case-insensitive; every other character is a delimiter and is skipped.
pub fn parse_solution(text: &str) -> Vec<Direction> {
    text.chars().filter_map(Direction::from_char).collect()
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "search time: {:.3}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "open set:    {}", self.open_size)?;
        writeln!(f, "closed set:  {}", self.closed_size)?;
        if self.success {
            write!(f, "moves:       {}", self.num_moves())
        } else {
            write!(f, "no solution found")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::state::Node;

    #[test]
    fn solution_parsing_skips_delimiters() {
        let moves = parse_solution("U D,l\nr *RU# 12");
        let text: String = moves.iter().map(|d| d.to_char()).collect();
        assert_eq!(text, "UDLRRU");
    }

    #[test]
    fn plain_grid_matches_render() {
        let level = Level::parse("xxxx\nxp@x\nxxxx").unwrap();
        let grid = level.state_map(&Node::start_unscored(&level), true);
        let mut plain = Vec::new();
        print_grid(&mut plain, &grid, false).unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "xxxx\nxp@x\nxxxx\n");

        let mut colored = Vec::new();
        print_grid(&mut colored, &grid, true).unwrap();
        assert!(String::from_utf8(colored).unwrap().contains("\x1b[36mp"));
    }
}
