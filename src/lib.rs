use std::fmt::{Display, Formatter};

use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};

mod board;
mod grid;
mod scenario;
mod search;

pub use board::Board;
pub use grid::{CellState, Grid, DEFAULT_GRID_SIZE};
pub use scenario::Scenario;
pub use search::{
    find_path, FoundPath, Host, NoopHost, Search, SearchOutcome, SearchRecord, SearchStatus,
    StepBudget,
};

/// Reasons a grid or a run cannot be set up. Detected before the engine starts.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum InvalidConfiguration {
    #[display(fmt = "Grid size must be positive, got {}", _0)]
    InvalidSize(i32),
    #[display(fmt = "Cell {} out of bounds", _0)]
    OutOfBounds(Point),
    #[display(fmt = "Start not set")]
    MissingStart,
    #[display(fmt = "End not set")]
    MissingEnd,
    #[display(fmt = "Start and end are the same cell")]
    StartIsEnd,
    #[display(fmt = "Start is a barrier")]
    StartIsBarrier,
    #[display(fmt = "End is a barrier")]
    EndIsBarrier,
}

impl std::error::Error for InvalidConfiguration {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, new)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Manhattan distance. Used as the search heuristic even though moves are 8-directional.
pub fn manhattan(a: &Point, b: &Point) -> i32 {
    let dr = (a.row - b.row).abs();
    let dc = (a.col - b.col).abs();
    dr + dc
}
