#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// private modules
mod calculator;
mod cfg;
mod correction;
mod ephemeris;
mod error;
mod scalar;
mod state;

pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::calculator::{LightTimeCalculator, LightTimeSolution};
    pub use crate::cfg::Config;
    pub use crate::correction::{
        first_order_relativistic_delay, ConstantDelay, CorrectionFn, CorrectionList,
        CorrectionType, FirstOrderRelativistic, LightTimeCorrection, PerturbingBody,
    };
    pub use crate::ephemeris::{
        resolve_ephemeris_update_order, BodyDependency, EphemerisDependencies,
    };
    pub use crate::error::Error;
    pub use crate::scalar::{LinkEndTime, Scalar};
    pub use crate::state::{LinkEnd, LinkEndState, StateProvider};
    // re-export
    pub use anise::prelude::Orbit;
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::{Vector3, Vector6};
}

// pub export
pub use error::Error;
