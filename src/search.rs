use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use derive_new::new;
use log::{debug, info};
use serde::Serialize;

use crate::{manhattan, CellState, Grid, InvalidConfiguration, Point};

/// The environment a search is animated in.
///
/// `draw` is called once per step and once per cell marked during path
/// reconstruction. `should_abort` is polled before every step.
pub trait Host {
    fn draw(&mut self, grid: &Grid);

    fn should_abort(&mut self) -> bool {
        false
    }
}

pub struct NoopHost;

impl Host for NoopHost {
    fn draw(&mut self, _grid: &Grid) {}
}

/// Aborts the wrapped host's run once `max_steps` steps have been taken.
#[derive(new)]
pub struct StepBudget<H: Host> {
    inner: H,
    max_steps: usize,
    #[new(default)]
    steps: usize,
}

impl<H: Host> StepBudget<H> {
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: Host> Host for StepBudget<H> {
    fn draw(&mut self, grid: &Grid) {
        self.inner.draw(grid);
    }

    fn should_abort(&mut self) -> bool {
        if self.steps >= self.max_steps {
            debug!("step budget of {} exhausted", self.max_steps);
            return true;
        }

        self.steps += 1;
        self.inner.should_abort()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, new)]
pub struct SearchRecord {
    pub f: i32,
    pub g: i32,
    pub predecessor: Option<Point>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchStatus {
    Running,
    Succeeded,
    Exhausted,
    Aborted,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, new)]
pub struct FoundPath {
    /// Start to end, both inclusive.
    pub cells: Vec<Point>,
    /// `g` of the end cell.
    pub cost: i32,
}

impl FoundPath {
    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SearchOutcome {
    Found(FoundPath),
    NoPathFound,
    Aborted,
}

/// A single A* run over a grid, driven one step at a time.
pub struct Search {
    start: Point,
    end: Point,
    open: OpenSet,
    records: HashMap<Point, SearchRecord>,
    explored: Vec<Point>,
    status: SearchStatus,
}

impl Search {
    pub fn new(grid: &Grid, start: Point, end: Point) -> Result<Self, InvalidConfiguration> {
        match grid.state(&start) {
            None => return Err(InvalidConfiguration::OutOfBounds(start)),
            Some(CellState::Barrier) => return Err(InvalidConfiguration::StartIsBarrier),
            Some(_) => {}
        }

        match grid.state(&end) {
            None => return Err(InvalidConfiguration::OutOfBounds(end)),
            Some(CellState::Barrier) => return Err(InvalidConfiguration::EndIsBarrier),
            Some(_) => {}
        }

        if start == end {
            return Err(InvalidConfiguration::StartIsEnd);
        }

        let mut open = OpenSet::default();
        open.push(start, 0);

        let mut records = HashMap::new();
        records.insert(start, SearchRecord::new(0, 0, None));

        Ok(Self {
            start,
            end,
            open,
            records,
            explored: Vec::new(),
            status: SearchStatus::Running,
        })
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Cells in the order they were taken off the open set. A cell whose
    /// cost improved after it was closed appears more than once.
    pub fn explored(&self) -> &[Point] {
        &self.explored
    }

    pub fn record(&self, point: &Point) -> Option<&SearchRecord> {
        self.records.get(point)
    }

    /// Pops the cheapest open cell and relaxes its neighbors.
    pub fn step(&mut self, grid: &mut Grid) -> SearchStatus {
        if self.status != SearchStatus::Running {
            return self.status;
        }

        let Some((curr, f)) = self.open.pop() else {
            self.status = SearchStatus::Exhausted;
            return self.status;
        };

        debug!("curr:{} f:{}", curr, f);
        self.explored.push(curr);

        if curr == self.end {
            info!("found path to {} after {} steps", self.end, self.explored.len());
            self.status = SearchStatus::Succeeded;
            return self.status;
        }

        if curr != self.start {
            grid.mark(&curr, CellState::Visited);
        }

        let curr_g = self.records.get(&curr).map_or(0, |record| record.g);

        for adj in grid.neighbors(&curr) {
            let g = curr_g + 1;
            let f = g + manhattan(&adj, &self.end);

            match self.records.get_mut(&adj) {
                None => {
                    self.records.insert(adj, SearchRecord::new(f, g, Some(curr)));
                    self.open.push(adj, f);

                    if adj != self.start && adj != self.end {
                        grid.mark(&adj, CellState::Frontier);
                    }
                }
                Some(record) if g < record.g => {
                    // Cell stays drawn as visited even though it is reopened.
                    debug!("relaxing {} g:{} -> {}", adj, record.g, g);
                    *record = SearchRecord::new(f, g, Some(curr));
                    self.open.push(adj, f);
                }
                Some(_) => {}
            }
        }

        if self.open.is_empty() {
            info!("no path from {} to {}", self.start, self.end);
            self.status = SearchStatus::Exhausted;
        }

        self.status
    }

    /// Steps until the search finishes or the host aborts, then marks the path.
    pub fn run<H: Host>(&mut self, grid: &mut Grid, host: &mut H) -> SearchOutcome {
        loop {
            match self.status {
                SearchStatus::Running => {}
                SearchStatus::Succeeded => {
                    return SearchOutcome::Found(self.reconstruct(grid, host));
                }
                SearchStatus::Exhausted => return SearchOutcome::NoPathFound,
                SearchStatus::Aborted => return SearchOutcome::Aborted,
            }

            if host.should_abort() {
                info!("search aborted after {} steps", self.explored.len());
                self.status = SearchStatus::Aborted;
                continue;
            }

            self.step(grid);
            host.draw(grid);
        }
    }

    fn reconstruct<H: Host>(&self, grid: &mut Grid, host: &mut H) -> FoundPath {
        let mut cells = vec![self.end];
        let mut curr = self.end;

        while let Some(prev) = self.records.get(&curr).and_then(|record| record.predecessor) {
            if prev != self.start {
                grid.mark(&prev, CellState::Path);
                host.draw(grid);
            }

            cells.push(prev);
            curr = prev;
        }

        cells.reverse();

        let cost = self.records.get(&self.end).map_or(0, |record| record.g);
        FoundPath::new(cells, cost)
    }
}

/// Validates the endpoints and runs a search to completion without animation.
pub fn find_path(
    grid: &mut Grid,
    start: Point,
    end: Point,
) -> Result<SearchOutcome, InvalidConfiguration> {
    let mut search = Search::new(grid, start, end)?;
    Ok(search.run(grid, &mut NoopHost))
}

/// Open cells keyed by `f`. Equal `f` values pop in the order the cells
/// first entered the set; lowering a cell's `f` while it is still open
/// keeps its place in that order.
#[derive(Default)]
struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    live: HashMap<Point, (i32, u64)>,
    next_seq: u64,
}

impl OpenSet {
    fn push(&mut self, point: Point, f: i32) {
        let seq = match self.live.get(&point) {
            Some(&(_, seq)) => seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };

        self.live.insert(point, (f, seq));
        self.heap.push(OpenEntry::new(point, f, seq));
    }

    fn pop(&mut self) -> Option<(Point, i32)> {
        while let Some(entry) = self.heap.pop() {
            //There can be stale entries for a point whose f was updated.
            if self.live.get(&entry.point) != Some(&(entry.f, entry.seq)) {
                continue;
            }

            self.live.remove(&entry.point);
            return Some((entry.point, entry.f));
        }

        None
    }

    fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[derive(PartialEq, Eq, new)]
struct OpenEntry {
    point: Point,
    f: i32,
    seq: u64,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then(self.seq.cmp(&other.seq))
            .reverse()
    }
}
