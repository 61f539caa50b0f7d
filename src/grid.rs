use std::{fmt, str::FromStr};

use crate::error::GridError;

/// Width and height of a grid or of the terminal.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Rect {
    w: usize, // x
    h: usize, // y
}

/// Fixed-size matrix of alive/dead cells stored row-major.
///
/// Every accessor is bounds-checked: a coordinate outside the grid is an
/// [`GridError::OutOfRange`], never a read of a neighbouring row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: Rect,
    cells: Vec<bool>,
}

impl Rect {
    #[inline]
    pub fn new(width: usize, height: usize) -> Self {
        Rect { w: width, h: height }
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.w * self.h
    }

    /// True when `self` fits inside `outer` along both axes.
    #[inline]
    pub fn fits_within(&self, outer: &Rect) -> bool {
        self.w <= outer.w && self.h <= outer.h
    }

    #[inline]
    pub fn unwrap(&self) -> (usize, usize) {
        (self.w, self.h)
    }
}

impl Grid {

    /// All-dead grid of the given size.
    ///
    /// Sizes whose cell count overflows `usize` or cannot be allocated are
    /// reported as [`GridError::TooLarge`].
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        let too_large = || GridError::TooLarge { width, height };
        let total = width.checked_mul(height).ok_or_else(too_large)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(total).map_err(|_| too_large())?;
        cells.resize(total, false);

        Ok(Grid {
            size: Rect::new(width, height),
            cells,
        })
    }

    /// Wraps an already materialized row-major buffer.
    pub(crate) fn from_cells(size: Rect, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), size.area());
        Grid { size, cells }
    }

    /// Parses a text pattern, one line per row.
    ///
    /// `'0'`, `' '` and `'.'` are dead, anything else is alive. Empty lines
    /// are skipped.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let mut rows: Vec<Vec<bool>> = vec![];

        for line in s.lines() {
            let r: Vec<bool> = line
                .trim_end_matches('\r')
                .chars()
                .map(|c| !matches!(c, '0' | ' ' | '.'))
                .collect();
            if !r.is_empty() {
                rows.push(r);
            }
        }

        let width = rows.first().map(Vec::len).ok_or(GridError::EmptyGrid)?;
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRows {
                row,
                expected: width,
                found: r.len(),
            });
        }

        let size = Rect::new(width, rows.len());
        Ok(Grid::from_cells(size, rows.concat()))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.w()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.h()
    }

    #[inline]
    pub fn size(&self) -> &Rect {
        &self.size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Result<bool, GridError> {
        self.index(x, y).map(|i| self.cells[i])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Rows from top to bottom, each `width` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(self.size.w())
    }

    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        let (w, h) = self.size.unwrap();
        if x >= w || y >= h {
            Err(GridError::OutOfRange { x, y, width: w, height: h })
        } else {
            Ok(y * w + x)
        }
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::parse(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row {
                f.write_str(if *c { "@" } else { " " })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_dead() {
        let g = Grid::new(60, 20).unwrap();
        assert_eq!(g.width(), 60);
        assert_eq!(g.height(), 20);
        assert_eq!(g.live_cells(), 0);
        assert_eq!(g.rows().count(), 20);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(Grid::new(0, 5), Err(GridError::EmptyGrid));
        assert_eq!(Grid::new(5, 0), Err(GridError::EmptyGrid));
    }

    #[test]
    fn oversized_grid_is_an_error() {
        assert_eq!(
            Grid::new(usize::MAX, 2),
            Err(GridError::TooLarge { width: usize::MAX, height: 2 })
        );
        // No overflow, but far more than any allocator will hand out.
        assert_eq!(
            Grid::new(usize::MAX / 2, 2),
            Err(GridError::TooLarge { width: usize::MAX / 2, height: 2 })
        );
    }

    #[test]
    fn set_then_get() {
        let mut g = Grid::new(4, 3).unwrap();
        g.set(3, 2, true).unwrap();
        assert!(g.get(3, 2).unwrap());
        assert!(!g.get(2, 2).unwrap());
        assert_eq!(g.live_cells(), 1);
    }

    #[test]
    fn out_of_range_does_not_wrap_into_next_row() {
        let mut g = Grid::new(4, 3).unwrap();
        g.set(0, 1, true).unwrap();
        // (4, 0) would alias (0, 1) in a flat buffer without the check.
        assert_eq!(
            g.get(4, 0),
            Err(GridError::OutOfRange { x: 4, y: 0, width: 4, height: 3 })
        );
        assert!(g.set(0, 3, true).is_err());
        assert_eq!(g.live_cells(), 1);
    }

    #[test]
    fn parse_and_display() {
        let g: Grid = ".#.\n0x0\n\n  @\n".parse().unwrap();
        assert_eq!(g.size().unwrap(), (3, 3));
        assert!(g.get(1, 0).unwrap());
        assert!(g.get(1, 1).unwrap());
        assert!(g.get(2, 2).unwrap());
        assert!(!g.get(0, 2).unwrap());
        assert_eq!(g.to_string(), " @ \n @ \n  @\n");
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        assert_eq!(
            Grid::parse("...\n..\n"),
            Err(GridError::RaggedRows { row: 1, expected: 3, found: 2 })
        );
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(Grid::parse("\n\n"), Err(GridError::EmptyGrid));
    }

    #[test]
    fn rect_fits_within() {
        let small = Rect::new(60, 20);
        assert!(small.fits_within(&Rect::new(80, 24)));
        assert!(!small.fits_within(&Rect::new(59, 100)));
        assert!(!small.fits_within(&Rect::new(100, 19)));
    }
}
