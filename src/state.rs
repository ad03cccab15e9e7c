use anise::prelude::Orbit;
use nalgebra::{Vector3, Vector6};

use crate::{error::Error, scalar::Scalar};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One end of the signal path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkEnd {
    /// Emitter of the signal
    Transmitter,
    /// Receiver of the signal
    Receiver,
}

impl std::fmt::Display for LinkEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Transmitter => write!(f, "transmitter"),
            Self::Receiver => write!(f, "receiver"),
        }
    }
}

/// Kinematic state of one [LinkEnd], position in meters
/// and velocity in m.s⁻¹.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinkEndState<S: Scalar> {
    /// Position [m]
    pub position: Vector3<S>,
    /// Velocity [m.s⁻¹]
    pub velocity: Vector3<S>,
}

impl<S: Scalar> Default for LinkEndState<S> {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
        }
    }
}

impl<S: Scalar> LinkEndState<S> {
    /// Builds a new [LinkEndState] from position [m] and velocity [m.s⁻¹].
    pub fn new(position: Vector3<S>, velocity: Vector3<S>) -> Self {
        Self { position, velocity }
    }

    /// Builds a static [LinkEndState] (null velocity).
    pub fn from_position(position: Vector3<S>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
        }
    }

    /// Builds a [LinkEndState] from the 6 cartesian components (x, y, z, vx, vy, vz).
    pub fn from_vector6(state: &Vector6<S>) -> Self {
        Self {
            position: state.fixed_rows::<3>(0).into_owned(),
            velocity: state.fixed_rows::<3>(3).into_owned(),
        }
    }

    /// Returns the 6 cartesian components (x, y, z, vx, vy, vz).
    pub fn to_vector6(&self) -> Vector6<S> {
        Vector6::new(
            self.position[0],
            self.position[1],
            self.position[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
        )
    }

    /// Converts to another scalar type, through double precision.
    pub fn cast<U: Scalar>(&self) -> LinkEndState<U> {
        LinkEndState {
            position: self.position.map(|x| U::from_double(x.to_double())),
            velocity: self.velocity.map(|x| U::from_double(x.to_double())),
        }
    }

    /// Distance [m] to the other [LinkEndState].
    pub fn distance(&self, rhs: &Self) -> S {
        (rhs.position - self.position).norm()
    }
}

impl From<Orbit> for LinkEndState<f64> {
    /// Converts an [Orbit] (km, km.s⁻¹) to a [LinkEndState] (m, m.s⁻¹).
    /// The frame is not checked: both link ends must be expressed in the same frame.
    fn from(orbit: Orbit) -> Self {
        Self {
            position: orbit.radius_km * 1.0E3,
            velocity: orbit.velocity_km_s * 1.0E3,
        }
    }
}

/// [StateProvider] gives the [LinkEndState] of one end of the link, at any
/// requested instant. The light time solver requests the states of the link end
/// that is not fixed at many instants close to the query epoch, so
/// implementations must be deterministic for a given instant.
///
/// Any closure `Fn(T) -> LinkEndState<S>` is a [StateProvider]. Implement this
/// trait directly when your state evaluation may fail: the error is forwarded as is.
/// Providers are shared by all threads solving with the same calculator.
pub trait StateProvider<T, S: Scalar>: Send + Sync {
    /// Provide the [LinkEndState] at requested instant.
    fn state_at(&self, t: T) -> Result<LinkEndState<S>, Error>;
}

impl<T, S: Scalar, F> StateProvider<T, S> for F
where
    F: Fn(T) -> LinkEndState<S> + Send + Sync,
{
    fn state_at(&self, t: T) -> Result<LinkEndState<S>, Error> {
        Ok(self(t))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anise::constants::frames::EARTH_J2000;
    use hifitime::Epoch;

    #[test]
    fn vector6_conversions() {
        let v = Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let state = LinkEndState::from_vector6(&v);
        assert_eq!(state.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(state.velocity, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(state.to_vector6(), v);
    }

    #[test]
    fn scalar_cast() {
        let state = LinkEndState::new(
            Vector3::new(1.5_f64, -2.0, 3.0),
            Vector3::new(0.5, 0.0, 0.0),
        );
        let single: LinkEndState<f32> = state.cast();
        assert_eq!(single.position, Vector3::new(1.5_f32, -2.0, 3.0));
        assert_eq!(single.cast::<f64>(), state);
    }

    #[test]
    fn distance() {
        let a = LinkEndState::from_position(Vector3::new(0.0, 3.0, 0.0));
        let b = LinkEndState::from_position(Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn from_orbit() {
        let t = Epoch::from_gregorian_utc_at_midnight(2020, 1, 1);
        let orbit = Orbit::new(7000.0, 0.0, 10.0, 0.0, 7.5, 0.0, t, EARTH_J2000);
        let state = LinkEndState::from(orbit);
        assert_eq!(state.position, Vector3::new(7.0E6, 0.0, 1.0E4));
        assert_eq!(state.velocity, Vector3::new(0.0, 7.5E3, 0.0));
    }

    #[test]
    fn closure_provider() {
        let provider = |t: f64| LinkEndState::from_position(Vector3::new(t, 0.0, 0.0));
        let state = provider.state_at(2.0).unwrap();
        assert_eq!(state.position[0], 2.0);
    }

    #[test]
    fn link_end_display() {
        assert_eq!(LinkEnd::Transmitter.to_string(), "transmitter");
        assert_eq!(LinkEnd::Receiver.to_string(), "receiver");
    }
}
