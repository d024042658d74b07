use serde::{Deserialize, Serialize};

use crate::{Board, InvalidConfiguration, Point, DEFAULT_GRID_SIZE};

/// Declarative description of a run: grid size, endpoints and barriers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_size")]
    pub size: i32,
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub barriers: Vec<Point>,
    /// Abort the search after this many steps.
    #[serde(default)]
    pub max_steps: Option<usize>,
}

fn default_size() -> i32 {
    DEFAULT_GRID_SIZE
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_board(&self) -> Result<Board, InvalidConfiguration> {
        if self.start == self.end {
            return Err(InvalidConfiguration::StartIsEnd);
        }
        if self.barriers.contains(&self.start) {
            return Err(InvalidConfiguration::StartIsBarrier);
        }
        if self.barriers.contains(&self.end) {
            return Err(InvalidConfiguration::EndIsBarrier);
        }

        let mut board = Board::new(self.size)?;
        board.paint(self.start)?;
        board.paint(self.end)?;
        for barrier in &self.barriers {
            board.paint(*barrier)?;
        }

        Ok(board)
    }
}
