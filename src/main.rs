use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use boxedin_solver::io::print_grid;
use boxedin_solver::{solve, Level};

/// Optimal solver for Boxed In levels.
#[derive(Parser)]
#[command(name = "solve", version)]
struct Args {
    /// Level file to solve
    level: PathBuf,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Write search statistics to FILE instead of stderr
    #[arg(long, value_name = "FILE")]
    stats: Option<PathBuf>,
}

fn run(args: &Args) -> Result<bool> {
    let text = fs::read_to_string(&args.level)
        .with_context(|| format!("reading {}", args.level.display()))?;
    let level = Level::parse(&text)
        .with_context(|| format!("parsing {}", args.level.display()))?;

    let mut stderr = std::io::stderr().lock();
    print_grid(&mut stderr, &level.render(), !args.no_color)?;

    let result = solve(&level);

    match &args.stats {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            writeln!(file, "{}", result)?;
        }
        None => writeln!(stderr, "{}", result)?,
    }

    if result.success {
        println!("{}", result.solution());
    }
    Ok(result.success)
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
