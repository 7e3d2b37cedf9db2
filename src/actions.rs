//! Flood-fill action generator.
//!
//! An action point is a tile reachable on foot where something
//! state-changing can happen: collect a gear, reach the exit, step onto a
//! switch, or push an adjacent box. The fill runs over the projected state
//! map and reuses it as its own visited marker.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::level::{self, CharGrid, Level, Point};
use crate::path::{Direction, EncodedPath, DIRECTIONS};
use crate::state::Node;

/// Shortest on-foot route to an action point plus the state-changing move.
/// For pushes and switch step-offs `point` is the tile the player ends on
/// (the pushed box's old tile), with the final move already in `path`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Action {
    pub path: EncodedPath,
    pub point: Point,
}

pub type Actions = SmallVec<[Action; 16]>;

#[derive(Clone, Copy)]
struct FillNode {
    path: EncodedPath,
    point: Point,
}

/// Is there a box one step in `dir` from `p` that can be pushed onward?
/// The tile beyond the box must be floor, an already-filled tile or a
/// switch; never a wall, box, gear, gate or the exit.
fn box_push(grid: &CharGrid, p: Point, dir: Direction) -> bool {
    let Some(t1) = p.step(dir, grid.width, grid.height) else {
        return false;
    };
    if grid.at(t1) != level::BOX {
        return false;
    }
    match t1.step(dir, grid.width, grid.height) {
        Some(t2) => level::is_box_target(grid.at(t2)),
        None => false,
    }
}

fn push_move(base: &FillNode, dir: Direction, actions: &mut Actions, grid: &CharGrid) {
    let mut action = Action {
        path: base.path,
        point: base.point,
    };
    if action.path.push(dir).is_err() {
        // Walks are bounded by the tile count, so this cannot trigger, but
        // a refused push only costs us one candidate branch.
        eprintln!("warning: dropping action at ({},{}): path full", base.point.x, base.point.y);
        return;
    }
    match action.point.step(dir, grid.width, grid.height) {
        Some(p) => {
            action.point = p;
            actions.push(action);
        }
        None => {}
    }
}

/// Enumerates every action reachable from the node's player tile.
///
/// Special case: when the player is currently standing on a switch, the
/// only actions are the legal single-step moves off it. Leaving a switch
/// flips global gate state, so it is treated as an atomic branching action
/// rather than a pass-through tile.
pub fn find_actions(level: &Level, node: &Node) -> Actions {
    let mut actions = Actions::new();
    let mut grid = level.state_map(node, false);

    let player_on_switch = level::is_switch(grid.at(node.player));

    let mut queue: VecDeque<FillNode> = VecDeque::new();
    queue.push_back(FillNode {
        path: EncodedPath::new(),
        point: node.player,
    });

    while let Some(fnode) = queue.pop_front() {
        let p = fnode.point;

        if player_on_switch {
            for dir in DIRECTIONS {
                if Level::can_move(&grid, p, dir) {
                    push_move(&fnode, dir, &mut actions, &grid);
                }
            }
            break;
        }

        if grid.at(p) == level::FILLED {
            continue;
        }

        let c = grid.at(p);
        if c == level::EXIT || c == level::GEAR || level::is_switch(c) {
            actions.push(Action {
                path: fnode.path,
                point: p,
            });
        } else {
            // A single tile can push more than one box, e.g. one above and
            // one below.
            for dir in DIRECTIONS {
                if box_push(&grid, p, dir) {
                    push_move(&fnode, dir, &mut actions, &grid);
                }
            }
        }

        for dir in DIRECTIONS {
            if let Some(next) = p.step(dir, grid.width, grid.height) {
                if level::is_walkable(grid.at(next)) {
                    let mut neighbor = fnode;
                    if neighbor.path.push(dir).is_err() {
                        eprintln!(
                            "warning: flood fill path full at ({},{})",
                            next.x, next.y
                        );
                        continue;
                    }
                    neighbor.point = next;
                    queue.push_back(neighbor);
                }
            }
        }

        grid.set(p, level::FILLED);
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions_for(text: &str) -> Actions {
        let level = Level::parse(text).unwrap();
        let node = Node::start_unscored(&level);
        find_actions(&level, &node)
    }

    #[test]
    fn three_box_corridor_yields_three_pushes() {
        let actions = actions_for(
            "\
''''''''''
'xxxxxxxx'
'x  +  xx'
'xp +  @x'
'x  +  xx'
'xxxxxxxx'
''''''''''",
        );
        assert_eq!(actions.len(), 3);
        let mut paths: Vec<String> = actions.iter().map(|a| a.path.to_string()).collect();
        paths.sort();
        assert_eq!(paths, ["DRR", "RR", "URR"]);
        // Every push lands the player on the pushed box's old tile.
        for a in &actions {
            assert_eq!(a.point, Point::new(4, a.point.y));
        }
    }

    #[test]
    fn gear_exit_and_switch_are_action_points() {
        let actions = actions_for(
            "\
xxxxxx
xp * x
x  r@x
xxxxRx
xxxx x
xxxxxx",
        );
        // Gear at (3,1), switch at (3,2), exit at (4,2); all reachable.
        let points: Vec<Point> = actions.iter().map(|a| a.point).collect();
        assert!(points.contains(&Point::new(3, 1)));
        assert!(points.contains(&Point::new(3, 2)));
        assert!(points.contains(&Point::new(4, 2)));
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn player_on_switch_only_steps_off() {
        let level = Level::parse(
            "\
xxxxx
x @Rx
xr  x
x *px
xxxxx",
        )
        .unwrap();
        let mut node = Node::start_unscored(&level);
        // Place the player on the switch; reachable mid-search, not in the
        // input grid.
        node.player = Point::new(1, 2);
        let actions = find_actions(&level, &node);

        // Open directions from the switch: up, down, right. The fill must
        // not continue to the gear or exit.
        assert_eq!(actions.len(), 3);
        for a in &actions {
            assert_eq!(a.path.len(), 1);
        }
        let points: Vec<Point> = actions.iter().map(|a| a.point).collect();
        assert!(points.contains(&Point::new(1, 1)));
        assert!(points.contains(&Point::new(1, 3)));
        assert!(points.contains(&Point::new(2, 2)));
    }

    #[test]
    fn boxes_cannot_be_pushed_onto_gear_exit_or_gate() {
        let actions = actions_for(
            "\
xxxxxxx
xp+*  x
x + @ x
x +R  x
x  r  x
xxxxxxx",
        );
        // Box (2,1) can only be pushed right, onto the gear: illegal, so
        // its tile never becomes an action point. Box (2,3) only toward
        // the gate or another box: same. Box (2,2) can go left or right.
        let points: Vec<Point> = actions.iter().map(|a| a.point).collect();
        assert!(!points.contains(&Point::new(2, 1)), "push onto gear");
        assert!(!points.contains(&Point::new(2, 3)), "push onto gate");
        assert!(points.contains(&Point::new(2, 2)));
        assert!(points.contains(&Point::new(3, 1))); // gear
        assert!(points.contains(&Point::new(4, 2))); // exit
        assert!(points.contains(&Point::new(3, 4))); // switch
    }
}
