use log::{debug, warn};

use crate::{CellState, Grid, Host, InvalidConfiguration, Point, Search, SearchOutcome};

/// A grid being edited by a user, with at most one start and one end.
pub struct Board {
    grid: Grid,
    start: Option<Point>,
    end: Option<Point>,
}

impl Board {
    pub fn new(size: i32) -> Result<Self, InvalidConfiguration> {
        Ok(Self {
            grid: Grid::create(size)?,
            start: None,
            end: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Places the start, then the end, then barriers on later calls.
    /// Painting over the start or end does nothing.
    pub fn paint(&mut self, point: Point) -> Result<CellState, InvalidConfiguration> {
        if !self.grid.in_bounds(&point) {
            return Err(InvalidConfiguration::OutOfBounds(point));
        }

        let is_start = self.start == Some(point);
        let is_end = self.end == Some(point);

        let state = if self.start.is_none() && !is_end {
            self.start = Some(point);
            CellState::Start
        } else if self.end.is_none() && !is_start {
            self.end = Some(point);
            CellState::End
        } else if !is_start && !is_end {
            CellState::Barrier
        } else {
            warn!("refusing to paint over endpoint {}", point);
            return Ok(if is_start {
                CellState::Start
            } else {
                CellState::End
            });
        };

        debug!("painted {} as {:?}", point, state);
        self.grid.set_state(&point, state)?;
        Ok(state)
    }

    /// Resets a cell to empty, forgetting it as start or end.
    pub fn erase(&mut self, point: Point) -> Result<(), InvalidConfiguration> {
        self.grid.set_state(&point, CellState::Empty)?;
        self.clear_endpoint(&point);
        Ok(())
    }

    /// Replaces the grid with a fresh one of the same size.
    pub fn clear(&mut self) {
        self.grid = self.grid.reset();
        self.start = None;
        self.end = None;
    }

    /// Clears marks of any earlier run and searches from start to end.
    pub fn run<H: Host>(
        &mut self,
        host: &mut H,
    ) -> Result<(Search, SearchOutcome), InvalidConfiguration> {
        let start = self.start.ok_or(InvalidConfiguration::MissingStart)?;
        let end = self.end.ok_or(InvalidConfiguration::MissingEnd)?;

        self.grid.clear_search_marks();

        let mut search = Search::new(&self.grid, start, end)?;
        let outcome = search.run(&mut self.grid, host);
        Ok((search, outcome))
    }

    fn clear_endpoint(&mut self, point: &Point) {
        if self.start.as_ref() == Some(point) {
            self.start = None;
        } else if self.end.as_ref() == Some(point) {
            self.end = None;
        }
    }
}
