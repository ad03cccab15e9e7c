#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::MAX_LIGHT_TIME_ITERATIONS, error::Error};

#[cfg(doc)]
use crate::prelude::LightTimeCalculator;

fn default_iterate_corrections() -> bool {
    false
}

fn default_tolerance() -> Option<f64> {
    None
}

fn default_max_iterations() -> usize {
    MAX_LIGHT_TIME_ITERATIONS
}

/// [LightTimeCalculator] parametrization
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Recalculate the light time corrections at every iteration.
    /// When false, they are calculated once at the beginning, then
    /// once more when convergence is reached to verify that the updated
    /// correction does not violate convergence. If it does, iteration
    /// resumes with corrections recalculated at every step.
    #[cfg_attr(feature = "serde", serde(default = "default_iterate_corrections"))]
    pub iterate_corrections: bool,

    /// Maximal light time difference [s] between two successive iterations
    /// for the solution to be accepted. When undefined, the default tolerance
    /// of the scalar types in use applies.
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub tolerance: Option<f64>,

    /// Maximal number of iterations, settling iteration included,
    /// before the solution is declared unconverged.
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterate_corrections: default_iterate_corrections(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with corrections recalculated at every iteration.
    pub fn with_iterated_corrections(&self, iterate: bool) -> Self {
        let mut s = *self;
        s.iterate_corrections = iterate;
        s
    }

    /// Copies and returns [Config] with updated tolerance [s].
    pub fn with_tolerance(&self, tolerance: f64) -> Self {
        let mut s = *self;
        s.tolerance = Some(tolerance);
        s
    }

    /// Copies and returns [Config] with updated iteration limit.
    pub fn with_max_iterations(&self, max_iterations: usize) -> Self {
        let mut s = *self;
        s.max_iterations = max_iterations;
        s
    }

    /// Verifies this [Config] is usable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be > 0"));
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(Error::InvalidConfig("tolerance must be positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert!(!cfg.iterate_corrections);
        assert!(cfg.tolerance.is_none());
        assert_eq!(cfg.max_iterations, 20);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder() {
        let cfg = Config::default()
            .with_iterated_corrections(true)
            .with_tolerance(1.0E-9)
            .with_max_iterations(5);
        assert!(cfg.iterate_corrections);
        assert_eq!(cfg.tolerance, Some(1.0E-9));
        assert_eq!(cfg.max_iterations, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_iterations() {
        let cfg = Config::default().with_max_iterations(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_invalid_tolerance() {
        for tolerance in [0.0, -1.0E-9, f64::NAN, f64::INFINITY] {
            let cfg = Config::default().with_tolerance(tolerance);
            assert_eq!(
                cfg.validate(),
                Err(Error::InvalidConfig("tolerance must be positive"))
            );
        }
    }

    #[test]
    #[cfg(feature = "serde")]
    fn deserialize() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());

        let cfg: Config =
            serde_json::from_str(r#"{"iterate_corrections": true, "tolerance": 1E-10}"#).unwrap();
        assert!(cfg.iterate_corrections);
        assert_eq!(cfg.tolerance, Some(1.0E-10));
        assert_eq!(cfg.max_iterations, 20);
    }
}
