
use life_engine::{
    config::LifeConfig,
    draw::{self, App},
    error::LifeError,
    patterns, seed, Grid, TransitionEngine,
};

use std::io::stdin;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = LifeConfig::from_env()?;
    info!(?config, "life starting");

    let world = initial_world(&config, std::env::args().nth(1).as_deref())?;
    let engine = TransitionEngine::new(config.boundary, config.rule);
    let a = App::new(config.max_generations, config.delay);
    draw::run(a, engine, world)?;
    Ok(())
}

/// `-` reads a pattern from stdin, a name picks a built-in pattern, nothing
/// gives a random world.
fn initial_world(config: &LifeConfig, arg: Option<&str>) -> Result<Grid, LifeError> {
    match arg {
        Some("-") => Ok(Grid::parse(&readlines()?)?),
        Some(name) => {
            let pattern = patterns::find(name).ok_or_else(|| LifeError::UnknownPattern(name.to_owned()))?;
            let mut grid = Grid::new(config.width, config.height)?;
            patterns::stamp_centered(&mut grid, pattern)?;
            Ok(grid)
        }
        None => Ok(seed::random_grid(config.width, config.height, config.density, config.seed)?),
    }
}

fn readlines() -> std::io::Result<String> {
    let mut s = String::new();
    for w in stdin().lines() {
        let w = w?;
        if !w.is_empty() {
            s.push_str(&w);
            s.push('\n')
        } else {
            break
        }
    }
    if s.is_empty() {
        warn!("no pattern on stdin");
    }
    Ok(s)
}
