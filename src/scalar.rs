//! Numeric types the light time solver is generic over.
//!
//! The observation scalar (light time output), the state scalar (link end states)
//! and the time type are independent. Corrections are always evaluated in double precision,
//! so every type converts to and from `f64` at that boundary.
use std::fmt::{Debug, Display};

use hifitime::{Duration, Epoch};
use nalgebra::RealField;
use num_traits::ToPrimitive;

use crate::constants::{DEFAULT_LIGHT_TIME_TOLERANCE_F32, DEFAULT_LIGHT_TIME_TOLERANCE_F64};

/// Floating point scalar used either for light time results
/// or for link end states.
pub trait Scalar: RealField + Copy + ToPrimitive {
    /// Default acceptable light time difference [s] between two iterations,
    /// for this precision.
    fn default_light_time_tolerance() -> Self;

    /// Converts from the double precision working type.
    fn from_double(value: f64) -> Self {
        nalgebra::convert(value)
    }

    /// Converts to the double precision working type.
    fn to_double(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }
}

impl Scalar for f64 {
    fn default_light_time_tolerance() -> Self {
        DEFAULT_LIGHT_TIME_TOLERANCE_F64
    }
}

impl Scalar for f32 {
    fn default_light_time_tolerance() -> Self {
        DEFAULT_LIGHT_TIME_TOLERANCE_F32 as f32
    }
}

/// Time type at which link end states are evaluated.
/// Plain floats are interpreted as seconds past an arbitrary reference,
/// [Epoch] is supported natively.
pub trait LinkEndTime: Copy + Debug + Display {
    /// Returns this instant shifted by `dt_s` seconds.
    fn offset_seconds(self, dt_s: f64) -> Self;

    /// Expresses this instant in seconds, as handed to the corrections.
    fn to_seconds(self) -> f64;
}

impl LinkEndTime for f64 {
    fn offset_seconds(self, dt_s: f64) -> Self {
        self + dt_s
    }
    fn to_seconds(self) -> f64 {
        self
    }
}

impl LinkEndTime for f32 {
    fn offset_seconds(self, dt_s: f64) -> Self {
        (self as f64 + dt_s) as f32
    }
    fn to_seconds(self) -> f64 {
        self as f64
    }
}

impl LinkEndTime for Epoch {
    fn offset_seconds(self, dt_s: f64) -> Self {
        self + Duration::from_seconds(dt_s)
    }
    /// Seconds past J2000, in TDB.
    fn to_seconds(self) -> f64 {
        self.to_tdb_seconds()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::{TimeScale, Unit};

    #[test]
    fn default_tolerances() {
        assert_eq!(f64::default_light_time_tolerance(), 1.0E-12);
        assert!(f32::default_light_time_tolerance() > f64::default_light_time_tolerance() as f32);
    }

    #[test]
    fn double_conversions() {
        assert_eq!(f32::from_double(0.5), 0.5_f32);
        assert_eq!(0.25_f32.to_double(), 0.25);
        assert_eq!(f64::from_double(1.0E-3).to_double(), 1.0E-3);
    }

    #[test]
    fn epoch_offset() {
        let t0 = Epoch::from_gregorian(2020, 6, 25, 12, 0, 0, 0, TimeScale::GPST);
        let t1 = t0.offset_seconds(-0.075);
        let dt = (t0 - t1) - 75.0 * Unit::Millisecond;
        assert!(dt.abs() <= 1.0 * Unit::Nanosecond);
        assert!((t0.to_seconds() - t1.to_seconds() - 0.075).abs() < 1.0E-6);
    }

    #[test]
    fn float_offset() {
        assert_eq!(100.0_f64.offset_seconds(-0.5), 99.5);
        assert_eq!(100.0_f32.offset_seconds(0.5), 100.5_f32);
    }
}
