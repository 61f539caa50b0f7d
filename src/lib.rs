//! Conway's Game of Life on a fixed-size grid.
//!
//! [`engine::TransitionEngine`] turns one [`grid::Grid`] into the next
//! generation without touching its input; [`draw`] runs it in a terminal.

pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod seed;

pub use engine::{Boundary, Rule, TransitionEngine};
pub use error::{EngineError, GridError, LifeError};
pub use grid::Grid;
