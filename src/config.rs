//! Runtime configuration.
//!
//! Everything is read from `LIFE_*` environment variables; unset variables
//! fall back to the reference world (60x20, 10% alive, 300 ms per frame).

use std::{str::FromStr, time::Duration};

use crate::{
    engine::{Boundary, Rule},
    error::ConfigError,
    seed::DEFAULT_DENSITY,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LifeConfig {
    pub width: usize,
    pub height: usize,
    /// Probability of a cell starting alive in a random world.
    pub density: f64,
    /// Pause between two rendered generations.
    pub delay: Duration,
    /// Stop after this many generations.
    pub max_generations: u64,
    pub boundary: Boundary,
    pub rule: Rule,
    /// Fixed RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        LifeConfig {
            width: 60,
            height: 20,
            density: DEFAULT_DENSITY,
            delay: Duration::from_millis(300),
            max_generations: u64::MAX,
            boundary: Boundary::Bounded,
            rule: Rule::Conway,
            seed: None,
        }
    }
}

impl LifeConfig {
    /// Load from the process environment.
    ///
    /// Recognised variables: `LIFE_WIDTH`, `LIFE_HEIGHT`, `LIFE_DENSITY`,
    /// `LIFE_DELAY_MS`, `LIFE_MAX_GENERATIONS`, `LIFE_BOUNDARY`
    /// (`bounded` | `toroidal`), `LIFE_RULE` (`conway` | `s34`), `LIFE_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut c = LifeConfig::default();

        if let Some(v) = lookup("LIFE_WIDTH") {
            c.width = positive("LIFE_WIDTH", &v)?;
        }
        if let Some(v) = lookup("LIFE_HEIGHT") {
            c.height = positive("LIFE_HEIGHT", &v)?;
        }
        if let Some(v) = lookup("LIFE_DENSITY") {
            let d: f64 = parse("LIFE_DENSITY", &v)?;
            if !(0.0..=1.0).contains(&d) {
                return Err(invalid("LIFE_DENSITY", &v, "must be between 0 and 1"));
            }
            c.density = d;
        }
        if let Some(v) = lookup("LIFE_DELAY_MS") {
            c.delay = Duration::from_millis(parse("LIFE_DELAY_MS", &v)?);
        }
        if let Some(v) = lookup("LIFE_MAX_GENERATIONS") {
            c.max_generations = parse("LIFE_MAX_GENERATIONS", &v)?;
        }
        if let Some(v) = lookup("LIFE_BOUNDARY") {
            c.boundary = match v.trim().to_ascii_lowercase().as_str() {
                "bounded" => Boundary::Bounded,
                "toroidal" | "torus" => Boundary::Toroidal,
                _ => return Err(invalid("LIFE_BOUNDARY", &v, "expected `bounded` or `toroidal`")),
            };
        }
        if let Some(v) = lookup("LIFE_RULE") {
            c.rule = match v.trim().to_ascii_lowercase().as_str() {
                "conway" | "b3/s23" => Rule::Conway,
                "s34" | "b3/s34" => Rule::Survive34,
                _ => return Err(invalid("LIFE_RULE", &v, "expected `conway` or `s34`")),
            };
        }
        if let Some(v) = lookup("LIFE_SEED") {
            c.seed = Some(parse("LIFE_SEED", &v)?);
        }

        Ok(c)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_owned(),
        reason: reason.into(),
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(var, value, e.to_string()))
}

fn positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match parse::<usize>(var, value)? {
        0 => Err(invalid(var, value, "must be positive")),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&'static str, &str)]) -> Result<LifeConfig, ConfigError> {
        let map: HashMap<&str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        LifeConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_match_reference_world() {
        let c = load(&[]).unwrap();
        assert_eq!(c, LifeConfig::default());
        assert_eq!((c.width, c.height), (60, 20));
        assert_eq!(c.boundary, Boundary::Bounded);
        assert_eq!(c.rule, Rule::Conway);
    }

    #[test]
    fn overrides() {
        let c = load(&[
            ("LIFE_WIDTH", "80"),
            ("LIFE_HEIGHT", " 24 "),
            ("LIFE_DENSITY", "0.25"),
            ("LIFE_DELAY_MS", "50"),
            ("LIFE_MAX_GENERATIONS", "1000"),
            ("LIFE_BOUNDARY", "Toroidal"),
            ("LIFE_RULE", "s34"),
            ("LIFE_SEED", "99"),
        ])
        .unwrap();
        assert_eq!((c.width, c.height), (80, 24));
        assert_eq!(c.density, 0.25);
        assert_eq!(c.delay, Duration::from_millis(50));
        assert_eq!(c.max_generations, 1000);
        assert_eq!(c.boundary, Boundary::Toroidal);
        assert_eq!(c.rule, Rule::Survive34);
        assert_eq!(c.seed, Some(99));
    }

    #[test]
    fn zero_width_is_invalid() {
        let err = load(&[("LIFE_WIDTH", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LIFE_WIDTH", .. }));
    }

    #[test]
    fn garbage_values_are_invalid() {
        assert!(load(&[("LIFE_HEIGHT", "tall")]).is_err());
        assert!(load(&[("LIFE_DENSITY", "1.5")]).is_err());
        assert!(load(&[("LIFE_BOUNDARY", "sphere")]).is_err());
        assert!(load(&[("LIFE_RULE", "highlife")]).is_err());
        assert!(load(&[("LIFE_SEED", "-1")]).is_err());
    }
}
