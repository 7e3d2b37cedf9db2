//! End-to-end runs over small hand-checked levels.

use boxedin_solver::io::parse_solution;
use boxedin_solver::{solve, Direction, Heuristic, Level};

const OPEN_ROOM: &str = "\
xxxxxxx
xp  * x
x     x
x    @x
xxxxxxx";

const CORRIDOR_BOX: &str = "\
xxxxxxx
x     x
xp+ *@x
xxxxxxx";

const SWITCH_GATE: &str = "\
xxxxxxx
xp+r  x
x    *x
xxxRxxx
xxx@xxx
xxxxxxx";

const SEALED_GEAR: &str = "\
xxxxx
xp@ x
x  +x
xx+*x
xxxxx";

/// Replays moves with full legality checks; true when the run ends with
/// every gear collected and the player on the exit.
fn replay(level: &Level, moves: &[Direction]) -> bool {
    let mut level = level.clone();
    for &dir in moves {
        let grid = level.render();
        assert!(
            Level::can_move(&grid, level.player, dir),
            "illegal move {} at ({},{})",
            dir.to_char(),
            level.player.x,
            level.player.y
        );
        level.step(dir);
        level.try_pickup_gear();
    }
    level.gears_left() == 0 && level.player == level.exit
}

#[test]
fn open_room_solved_in_six() {
    let level = Level::parse(OPEN_ROOM).unwrap();
    let result = solve(&level);
    assert!(result.success);
    assert_eq!(result.num_moves(), 6);
    assert!(replay(&level, &result.moves));
}

#[test]
fn corridor_box_detour_costs_six() {
    // Pushing the box twice would shove it onto the gear, which is
    // illegal, so the solver has to route around it. Both the detour and
    // the single-push route cost six moves.
    let level = Level::parse(CORRIDOR_BOX).unwrap();
    let result = solve(&level);
    assert!(result.success);
    assert_eq!(result.num_moves(), 6);
    assert!(replay(&level, &result.moves));
}

#[test]
fn switch_must_be_held_by_the_box() {
    // The gate on the only route to the exit stays open only while the
    // box sits on its switch. Optimum: push the box onto the switch
    // first, then collect the gear and walk out through the gate.
    let level = Level::parse(SWITCH_GATE).unwrap();
    let result = solve(&level);
    assert!(result.success);
    assert_eq!(result.num_moves(), 9);
    assert!(replay(&level, &result.moves));
}

#[test]
fn known_solution_replays_to_the_goal() {
    let level = Level::parse(SWITCH_GATE).unwrap();
    let moves = parse_solution("R DRRR,llDD");
    assert_eq!(moves.len(), 9);
    assert!(replay(&level, &moves));
}

#[test]
fn sealed_gear_reports_failure() {
    let level = Level::parse(SEALED_GEAR).unwrap();
    let result = solve(&level);
    assert!(!result.success);
    assert_eq!(result.num_moves(), 0);
}

#[test]
fn heuristic_never_exceeds_the_optimum() {
    for text in [OPEN_ROOM, CORRIDOR_BOX, SWITCH_GATE] {
        let level = Level::parse(text).unwrap();
        let result = solve(&level);
        assert!(result.success);
        let mut h = Heuristic::new(&level);
        let start = boxedin_solver::Node::start_unscored(&level);
        let estimate = h.estimate(level.tile_index(start.player), start.gears);
        assert!(
            (estimate as usize) <= result.num_moves(),
            "inadmissible estimate {} > {} on:\n{}",
            estimate,
            result.num_moves(),
            text
        );
    }
}
