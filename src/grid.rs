use std::fmt::{Display, Formatter};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{InvalidConfiguration, Point};

/// Side length used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: i32 = 50;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    Frontier,
    Visited,
    Path,
}

impl CellState {
    fn symbol(&self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Frontier => 'o',
            CellState::Visited => 'x',
            CellState::Path => '*',
        }
    }

    fn is_search_mark(&self) -> bool {
        matches!(
            self,
            CellState::Frontier | CellState::Visited | CellState::Path
        )
    }
}

/// Square grid of cells, indexed `[row][col]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn create(size: i32) -> Result<Self, InvalidConfiguration> {
        if size <= 0 {
            return Err(InvalidConfiguration::InvalidSize(size));
        }

        let n = size as usize;
        Ok(Self {
            size,
            cells: vec![vec![CellState::Empty; n]; n],
        })
    }

    /// A fresh grid of the same size with every cell `Empty`.
    pub fn reset(&self) -> Self {
        let n = self.size as usize;
        Self {
            size: self.size,
            cells: vec![vec![CellState::Empty; n]; n],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, point: &Point) -> bool {
        point.row >= 0 && point.col >= 0 && point.row < self.size && point.col < self.size
    }

    pub fn state(&self, point: &Point) -> Option<CellState> {
        if !self.in_bounds(point) {
            return None;
        }

        Some(self.cells[point.row as usize][point.col as usize])
    }

    /// Overwrites a cell. Only bounds are checked; start/end uniqueness is up to the caller.
    pub fn set_state(
        &mut self,
        point: &Point,
        state: CellState,
    ) -> Result<(), InvalidConfiguration> {
        if !self.in_bounds(point) {
            return Err(InvalidConfiguration::OutOfBounds(*point));
        }

        self.cells[point.row as usize][point.col as usize] = state;
        Ok(())
    }

    /// Search-side write for cells already known to be in bounds.
    pub(crate) fn mark(&mut self, point: &Point, state: CellState) {
        self.cells[point.row as usize][point.col as usize] = state;
    }

    /// Passable neighbors in the order N, NE, E, SE, S, SW, W, NW.
    ///
    /// Computed from the current barrier layout on every call, never cached.
    pub fn neighbors(&self, point: &Point) -> Vec<Point> {
        let mut neighbors = Vec::with_capacity(DIRECTIONS.len());

        for dir in DIRECTIONS {
            let adj = Point::new(point.row + dir.dr, point.col + dir.dc);

            match self.state(&adj) {
                None => continue,
                Some(CellState::Barrier) => continue,
                Some(_) => neighbors.push(adj),
            }
        }

        neighbors
    }

    /// Resets frontier, visited and path cells left by an earlier search.
    pub fn clear_search_marks(&mut self) {
        let mut cleared = 0;
        for row in &mut self.cells {
            for cell in row.iter_mut().filter(|cell| cell.is_search_mark()) {
                *cell = CellState::Empty;
                cleared += 1;
            }
        }
        debug!("cleared {} search marks", cleared);
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == state)
            .count()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().map(CellState::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Direction {
    dr: i32,
    dc: i32,
}

impl Direction {
    const fn new(dr: i32, dc: i32) -> Self {
        Self { dr, dc }
    }
}

const N: Direction = Direction::new(-1, 0);
const NE: Direction = Direction::new(-1, 1);
const E: Direction = Direction::new(0, 1);
const SE: Direction = Direction::new(1, 1);
const S: Direction = Direction::new(1, 0);
const SW: Direction = Direction::new(1, -1);
const W: Direction = Direction::new(0, -1);
const NW: Direction = Direction::new(-1, -1);
// Order decides which of several equal-cost paths is found.
const DIRECTIONS: [Direction; 8] = [N, NE, E, SE, S, SW, W, NW];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_points(grid: &Grid) -> Vec<Point> {
        let n = grid.size();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| Point::new(row, col)))
            .collect()
    }

    #[test]
    fn test_create() {
        let grid = Grid::create(3).unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.count(CellState::Empty), 9);
    }

    #[test]
    fn test_create_invalid_size() {
        assert_eq!(Grid::create(0), Err(InvalidConfiguration::InvalidSize(0)));
        assert_eq!(Grid::create(-4), Err(InvalidConfiguration::InvalidSize(-4)));
    }

    #[test]
    fn test_set_state_out_of_bounds() {
        let mut grid = Grid::create(3).unwrap();
        let outside = Point::new(3, 0);

        assert_eq!(
            grid.set_state(&outside, CellState::Barrier),
            Err(InvalidConfiguration::OutOfBounds(outside))
        );
        assert_eq!(grid.state(&outside), None);
        assert_eq!(grid.state(&Point::new(-1, 1)), None);
    }

    #[test]
    fn test_neighbors_order() {
        let grid = Grid::create(3).unwrap();

        assert_eq!(
            grid.neighbors(&Point::new(1, 1)),
            vec![
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(1, 2),
                Point::new(2, 2),
                Point::new(2, 1),
                Point::new(2, 0),
                Point::new(1, 0),
                Point::new(0, 0),
            ]
        );
    }

    #[test]
    fn test_neighbors_corner() {
        let grid = Grid::create(3).unwrap();

        assert_eq!(
            grid.neighbors(&Point::new(0, 0)),
            vec![Point::new(0, 1), Point::new(1, 1), Point::new(1, 0)]
        );
        assert_eq!(
            grid.neighbors(&Point::new(2, 2)),
            vec![Point::new(1, 2), Point::new(2, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn test_neighbors_single_cell() {
        let grid = Grid::create(1).unwrap();
        assert!(grid.neighbors(&Point::new(0, 0)).is_empty());
    }

    #[test]
    fn test_neighbors_skip_barriers() {
        let mut grid = Grid::create(5).unwrap();
        for (row, col) in [(0, 0), (2, 3), (3, 1), (1, 4)] {
            grid.set_state(&Point::new(row, col), CellState::Barrier)
                .unwrap();
        }
        grid.set_state(&Point::new(2, 2), CellState::Visited).unwrap();

        for point in all_points(&grid) {
            let neighbors = grid.neighbors(&point);
            assert!(neighbors.len() <= 8);

            for adj in &neighbors {
                assert!(grid.in_bounds(adj));
                assert_ne!(grid.state(adj), Some(CellState::Barrier));
                assert!((adj.row - point.row).abs() <= 1);
                assert!((adj.col - point.col).abs() <= 1);
                assert_ne!(*adj, point);
            }

            assert_eq!(neighbors, grid.neighbors(&point));
        }

        assert_eq!(grid.neighbors(&Point::new(2, 2)).len(), 6);
    }

    #[test]
    fn test_neighbors_follow_edits() {
        let mut grid = Grid::create(3).unwrap();
        let center = Point::new(1, 1);
        assert_eq!(grid.neighbors(&center).len(), 8);

        grid.set_state(&Point::new(0, 1), CellState::Barrier).unwrap();
        assert_eq!(grid.neighbors(&center).len(), 7);

        grid.set_state(&Point::new(0, 1), CellState::Empty).unwrap();
        assert_eq!(grid.neighbors(&center).len(), 8);
    }

    #[test]
    fn test_reset() {
        let mut grid = Grid::create(4).unwrap();
        let states = [
            CellState::Barrier,
            CellState::Start,
            CellState::End,
            CellState::Frontier,
            CellState::Visited,
            CellState::Path,
        ];
        for (i, state) in states.into_iter().enumerate() {
            grid.set_state(&Point::new(i as i32 / 4, i as i32 % 4), state)
                .unwrap();
        }

        let fresh = grid.reset();
        assert_eq!(fresh.size(), 4);
        for point in all_points(&fresh) {
            assert_eq!(fresh.state(&point), Some(CellState::Empty));
        }
        assert_eq!(fresh.reset(), fresh);
    }

    #[test]
    fn test_clear_search_marks() {
        let mut grid = Grid::create(3).unwrap();
        grid.set_state(&Point::new(0, 0), CellState::Start).unwrap();
        grid.set_state(&Point::new(2, 2), CellState::End).unwrap();
        grid.set_state(&Point::new(1, 1), CellState::Barrier).unwrap();
        grid.set_state(&Point::new(0, 1), CellState::Visited).unwrap();
        grid.set_state(&Point::new(1, 2), CellState::Path).unwrap();
        grid.set_state(&Point::new(1, 0), CellState::Frontier).unwrap();

        grid.clear_search_marks();

        assert_eq!(grid.to_string(), "S..\n.#.\n..E\n");
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::create(2).unwrap();
        grid.set_state(&Point::new(0, 0), CellState::Start).unwrap();
        grid.set_state(&Point::new(0, 1), CellState::Frontier).unwrap();
        grid.set_state(&Point::new(1, 0), CellState::Path).unwrap();
        grid.set_state(&Point::new(1, 1), CellState::Visited).unwrap();

        assert_eq!(grid.to_string(), "So\n*x\n");
    }
}
