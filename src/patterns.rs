use crate::{error::GridError, grid::Grid};

/// A named starter shape, cells given as `(x, y)` relative to its top-left.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
    Pattern {
        name: "gosper-glider-gun",
        cells: &[
            (0, 4), (1, 4), (0, 5), (1, 5),
            (10, 4), (10, 5), (10, 6), (11, 3), (11, 7), (12, 2), (12, 8),
            (13, 2), (13, 8), (14, 5), (15, 3), (15, 7), (16, 4), (16, 5),
            (16, 6), (17, 5), (20, 2), (20, 3), (20, 4), (21, 2), (21, 3),
            (21, 4), (22, 1), (22, 5), (24, 0), (24, 1), (24, 5), (24, 6),
            (34, 2), (34, 3), (35, 2), (35, 3),
        ],
    },
];

impl Pattern {
    /// Bounding box as `(width, height)`.
    pub fn extent(&self) -> (usize, usize) {
        self.cells
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
    }
}

pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Sets the cells of `pattern` alive with its top-left corner at `(x, y)`.
///
/// Nothing is written if any cell would land outside the grid.
pub fn stamp(grid: &mut Grid, pattern: &Pattern, x: usize, y: usize) -> Result<(), GridError> {
    let (w, h) = pattern.extent();
    let fits = x.checked_add(w).is_some_and(|r| r <= grid.width())
        && y.checked_add(h).is_some_and(|b| b <= grid.height());
    if !fits {
        return Err(GridError::OutOfRange {
            x: x.saturating_add(w.saturating_sub(1)),
            y: y.saturating_add(h.saturating_sub(1)),
            width: grid.width(),
            height: grid.height(),
        });
    }
    for &(cx, cy) in pattern.cells {
        grid.set(x + cx, y + cy, true)?;
    }
    Ok(())
}

/// Stamps `pattern` in the middle of `grid`.
pub fn stamp_centered(grid: &mut Grid, pattern: &Pattern) -> Result<(), GridError> {
    let (w, h) = pattern.extent();
    let x = grid.width().saturating_sub(w) / 2;
    let y = grid.height().saturating_sub(h) / 2;
    stamp(grid, pattern, x, y)
}
