use thiserror::Error;

#[cfg(doc)]
use crate::prelude::{LightTimeCalculator, LightTimeCorrection, StateProvider};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The light time iteration did not settle within the iteration limit.
    /// Low accuracy state providers, too stringent tolerances or
    /// diverging corrections will wind up here. You may retry with a looser tolerance.
    #[error("light time unconverged at level {residual_s:e} s after {iterations} iterations: current correction is {correction_s:e} s and input epoch was {epoch}")]
    LightTimeNonConvergence {
        /// Last difference between two successive light time estimates [s]
        residual_s: f64,
        /// Correction sum at the time we gave up [s]
        correction_s: f64,
        /// Query epoch, as displayed by its time type
        epoch: String,
        /// Iterations performed
        iterations: usize,
    },

    /// Light time estimate became NaN or infinite, which is always caused by
    /// a [StateProvider] or a [LightTimeCorrection] returning non finite values.
    #[error("non finite light time estimate at iteration #{iteration} for input epoch {epoch}")]
    NonFiniteLightTime {
        /// Query epoch, as displayed by its time type
        epoch: String,
        /// Iteration the estimate was obtained at (0: initial guess)
        iteration: usize,
    },

    /// Ephemeris update order could not be determined within the step limit.
    /// Two bodies referring to one another (through their central body or
    /// ephemeris origin) is the typical cause.
    #[error("ephemeris update order undetermined after {0} steps: cyclic or inconsistent central body / ephemeris origin setup")]
    UnresolvableDependencies(usize),

    /// Integrated bodies, central bodies and ephemeris origins must describe
    /// the same bodies, position by position.
    #[error("misaligned dependencies: {integrated} integrated bodies, {central} central bodies, {origins} ephemeris origins")]
    MisalignedDependencies {
        integrated: usize,
        central: usize,
        origins: usize,
    },

    /// A geometry dependent [LightTimeCorrection] met a configuration
    /// it cannot be evaluated in.
    #[error("degenerate link geometry: {0}")]
    DegenerateGeometry(String),

    /// Any [LightTimeCorrection] implemented outside this crate may report its failure here.
    /// It is forwarded untouched by the [LightTimeCalculator].
    #[error("light time correction failure: {0}")]
    Correction(String),

    /// Any [StateProvider] implemented outside this crate may report its failure here.
    /// It is forwarded untouched by the [LightTimeCalculator].
    #[error("state provider failure: {0}")]
    StateProvider(String),

    /// Invalid solver parametrization
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
