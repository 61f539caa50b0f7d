//! Generation transition: neighbour lookup under a boundary policy and the
//! birth/survival rule.
//!
//! The engine reads one [`Grid`] and writes every cell of a freshly
//! allocated one, so evaluation order never matters and the input is
//! never touched.

use tracing::trace;

use crate::{
    error::EngineError,
    grid::{Grid, Rect},
};

/// Offsets of the 8 surrounding cells as `(dx, dy)`.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// What lies beyond the edge of the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Coordinates outside the grid are dead.
    #[default]
    Bounded,
    /// Edges connect to the opposite edge.
    Toroidal,
}

impl Boundary {
    /// Resolves the neighbour `(x + dx, y + dy)` of a cell in a `size` grid.
    ///
    /// Returns `None` when the neighbour does not exist under this policy.
    #[inline]
    pub fn resolve(self, x: usize, y: usize, dx: isize, dy: isize, size: &Rect) -> Option<(usize, usize)> {
        let (w, h) = size.unwrap();
        let (nx, ny) = (x as isize + dx, y as isize + dy);
        match self {
            Boundary::Bounded => {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    None
                } else {
                    Some((nx as usize, ny as usize))
                }
            }
            Boundary::Toroidal => Some((
                nx.rem_euclid(w as isize) as usize,
                ny.rem_euclid(h as isize) as usize,
            )),
        }
    }
}

/// Birth/survival rule. Birth always happens on exactly 3 neighbours.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Classic B3/S23.
    #[default]
    Conway,
    /// B3/S34: live cells survive with 3 or 4 neighbours.
    Survive34,
}

impl Rule {
    #[inline]
    pub fn next_state(self, alive: bool, live_neighbours: u8) -> bool {
        match (self, alive, live_neighbours) {
            (_, false, 3) => true,
            (Rule::Conway, true, 2 | 3) => true,
            (Rule::Survive34, true, 3 | 4) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEngine {
    pub boundary: Boundary,
    pub rule: Rule,
}

impl TransitionEngine {

    #[inline]
    pub fn new(boundary: Boundary, rule: Rule) -> Self {
        TransitionEngine { boundary, rule }
    }

    /// Number of alive cells among the 8 neighbours of `(x, y)`.
    ///
    /// Caller guarantees `(x, y)` is inside `grid`.
    pub fn live_neighbours(&self, grid: &Grid, x: usize, y: usize) -> u8 {
        let mut n = 0;
        for (dx, dy) in NEIGHBOURS {
            let alive = self
                .boundary
                .resolve(x, y, dx, dy, grid.size())
                .and_then(|(nx, ny)| grid.get(nx, ny).ok())
                .unwrap_or(false);
            if alive {
                n += 1;
            }
        }
        n
    }

    /// Computes generation n+1 from `current` into a new grid.
    ///
    /// The result is fully built before it is returned; `current` is only read.
    pub fn next_generation(&self, current: &Grid) -> Result<Grid, EngineError> {
        let (w, h) = current.size().unwrap();
        let total = w * h;

        let mut cells: Vec<bool> = Vec::new();
        cells
            .try_reserve_exact(total)
            .map_err(|_| EngineError::Allocation { cells: total })?;

        for (y, row) in current.rows().enumerate() {
            for (x, alive) in row.iter().enumerate() {
                let n = self.live_neighbours(current, x, y);
                cells.push(self.rule.next_state(*alive, n));
            }
        }

        let next = Grid::from_cells(*current.size(), cells);
        trace!(live = next.live_cells(), "generation computed");
        Ok(next)
    }

    /// Applies [`next_generation`](Self::next_generation) `generations` times.
    pub fn advance(&self, grid: &Grid, generations: u64) -> Result<Grid, EngineError> {
        let mut current = grid.clone();
        for _ in 0..generations {
            current = self.next_generation(&current)?;
        }
        Ok(current)
    }

    /// Endless sequence of generations starting with `seed` itself.
    ///
    /// Each item owns its grid; the previous one is dropped by the caller.
    /// Stops after the first allocation failure.
    pub fn generations(self, seed: Grid) -> Generations {
        Generations {
            engine: self,
            next: Some(Ok(seed)),
        }
    }
}

pub struct Generations {
    engine: TransitionEngine,
    next: Option<Result<Grid, EngineError>>,
}

impl Iterator for Generations {
    type Item = Result<Grid, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if let Ok(grid) = &current {
            self.next = Some(self.engine.next_generation(grid));
        }
        Some(current)
    }
}
