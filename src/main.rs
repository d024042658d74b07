use std::fs;

use anyhow::Context;
use grid_pathviz::{Grid, Host, Point, Scenario, SearchOutcome, StepBudget, DEFAULT_GRID_SIZE};
use log::{info, log_enabled, trace, Level};

/// Logs every frame at trace level.
struct FrameLog {
    frames: usize,
}

impl Host for FrameLog {
    fn draw(&mut self, grid: &Grid) {
        self.frames += 1;
        if log_enabled!(Level::Trace) {
            trace!("frame {}:\n{}", self.frames, grid);
        }
    }
}

fn demo_scenario() -> Scenario {
    let mid = DEFAULT_GRID_SIZE / 2;
    Scenario {
        size: DEFAULT_GRID_SIZE,
        start: Point::new(mid, 5),
        end: Point::new(mid, DEFAULT_GRID_SIZE - 6),
        barriers: (5..DEFAULT_GRID_SIZE - 5)
            .map(|row| Point::new(row, mid))
            .collect(),
        max_steps: None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read scenario {}", path))?;
            Scenario::from_json(&json).with_context(|| format!("Invalid scenario {}", path))?
        }
        None => demo_scenario(),
    };

    info!(
        "{}x{} grid, {} -> {}, {} barriers",
        scenario.size,
        scenario.size,
        scenario.start,
        scenario.end,
        scenario.barriers.len()
    );

    let mut board = scenario.to_board().context("Invalid scenario")?;
    let max_steps = scenario.max_steps.unwrap_or(usize::MAX);
    let mut host = StepBudget::new(FrameLog { frames: 0 }, max_steps);

    let (search, outcome) = board.run(&mut host)?;

    println!("{}", board.grid());
    match outcome {
        SearchOutcome::Found(path) => {
            let cells: Vec<String> = path.cells.iter().map(Point::to_string).collect();
            println!(
                "path of {} steps (g={}): {}",
                path.steps(),
                path.cost,
                cells.join(" ")
            );
        }
        SearchOutcome::NoPathFound => println!("no path"),
        SearchOutcome::Aborted => println!("aborted after {} steps", host.steps()),
    }

    info!(
        "explored {} cells, drew {} frames",
        search.explored().len(),
        host.into_inner().frames
    );

    Ok(())
}
