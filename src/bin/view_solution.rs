use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use boxedin_solver::io::{parse_solution, print_grid};
use boxedin_solver::{Level, MoveError};

/// Replays a solution against a level, checking every move.
#[derive(Parser)]
#[command(name = "view-solution", version)]
struct Args {
    /// Level file
    level: PathBuf,

    /// Solution file (U/D/L/R, other characters are delimiters)
    solution: PathBuf,

    /// Show each move as an animation frame
    #[arg(long)]
    animate: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Frame delay in milliseconds when animating
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,
}

fn run(args: &Args) -> Result<bool> {
    let level_text = fs::read_to_string(&args.level)
        .with_context(|| format!("reading {}", args.level.display()))?;
    let mut level = Level::parse(&level_text)
        .with_context(|| format!("parsing {}", args.level.display()))?;
    let solution_text = fs::read_to_string(&args.solution)
        .with_context(|| format!("reading {}", args.solution.display()))?;
    let moves = parse_solution(&solution_text);

    let mut stdout = std::io::stdout().lock();
    if args.animate {
        write!(stdout, "\x1b[2J\x1b[H")?;
        print_grid(&mut stdout, &level.render(), !args.no_color)?;
        thread::sleep(Duration::from_millis(args.delay_ms));
    }

    for (i, dir) in moves.iter().enumerate() {
        let grid = level.render();
        if !Level::can_move(&grid, level.player, *dir) {
            return Err(MoveError {
                x: level.player.x,
                y: level.player.y,
                dir: dir.to_char(),
            })
            .with_context(|| format!("move {} of {}", i + 1, moves.len()));
        }
        level.step(*dir);
        level.try_pickup_gear();

        if args.animate {
            write!(stdout, "\x1b[2J\x1b[H")?;
            print_grid(&mut stdout, &level.render(), !args.no_color)?;
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    let solved = level.gears_left() == 0 && level.player == level.exit;
    if solved {
        println!("valid solution: {} moves", moves.len());
    } else {
        println!(
            "replay ends unsolved: {} gears left, player at ({},{})",
            level.gears_left(),
            level.player.x,
            level.player.y
        );
    }
    Ok(solved)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
