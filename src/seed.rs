//! Random initial worlds.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{error::GridError, grid::Grid};

/// Fraction of cells alive in a random world when nothing else is configured.
pub const DEFAULT_DENSITY: f64 = 0.1;

/// Fills every cell of `grid` independently, alive with probability `density`.
pub fn fill<R: Rng>(grid: &mut Grid, density: f64, rng: &mut R) -> Result<(), GridError> {
    let density = density.clamp(0.0, 1.0);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            grid.set(x, y, rng.random_bool(density))?;
        }
    }
    Ok(())
}

/// Builds a random `width` x `height` world.
///
/// With `seed` set the same world comes back on every call.
pub fn random_grid(width: usize, height: usize, density: f64, seed: Option<u64>) -> Result<Grid, GridError> {
    let mut grid = Grid::new(width, height)?;
    match seed {
        Some(s) => fill(&mut grid, density, &mut StdRng::seed_from_u64(s))?,
        None => fill(&mut grid, density, &mut rand::rng())?,
    }
    Ok(grid)
}
