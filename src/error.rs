//! Error types for the life engine.

/// Errors raised by [`Grid`](crate::grid::Grid) construction and access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A coordinate fell outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A grid needs at least one row and one column.
    #[error("grid must have a positive width and height")]
    EmptyGrid,

    /// `width * height` cells overflow `usize` or cannot be allocated.
    #[error("a {width}x{height} grid is too large to allocate")]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Pattern text whose rows differ in length.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
}

/// Errors raised while computing a generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Storage for the next generation could not be reserved.
    #[error("failed to allocate {cells} cells for the next generation")]
    Allocation {
        /// Number of cells requested.
        cells: usize,
    },
}

/// Invalid value in the environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A `LIFE_*` variable that could not be parsed or is out of range.
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value as found in the environment.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Application level error for the binary and the driver loop.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    /// Grid construction or access failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// A generation could not be computed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading stdin or driving the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The command line named a pattern that does not exist.
    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),

    /// The grid plus its status line does not fit on screen.
    #[error("a {width}x{height} grid does not fit a {cols}x{rows} terminal")]
    TerminalTooSmall {
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
        /// Terminal columns.
        cols: u16,
        /// Terminal rows.
        rows: u16,
    },
}

/// Result defaulting to [`LifeError`].
pub type Result<T, E = LifeError> = std::result::Result<T, E>;
