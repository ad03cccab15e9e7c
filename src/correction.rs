//! Light time corrections: signed delays, in seconds, that make the signal
//! travel time deviate from the euclidean distance divided by the speed of light.
use log::trace;
use nalgebra::Vector3;

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    error::Error,
    state::LinkEndState,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical effect represented by a [LightTimeCorrection]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CorrectionType {
    /// Shapiro delay caused by one or more massive bodies
    FirstOrderRelativistic,
    /// Fixed delay, for example hardware or cable delay
    ConstantDelay,
    /// Any other effect, wrapped from a user function
    FunctionWrapper,
    /// Sum of several corrections
    List,
}

/// Any [LightTimeCorrection] contributes a signed delay [s] to the light time.
/// It is evaluated in double precision from the link end states and the
/// transmission and reception instants [s], whatever precision the
/// light time solver uses.
pub trait LightTimeCorrection: Send + Sync {
    /// Physical effect this correction models
    fn correction_type(&self) -> CorrectionType;

    /// Returns the light time correction [s].
    fn light_time_correction(
        &self,
        transmitter: &LinkEndState<f64>,
        receiver: &LinkEndState<f64>,
        transmission_time: f64,
        reception_time: f64,
    ) -> Result<f64, Error>;
}

/// Wraps any function with the [LightTimeCorrection] signature,
/// to inject a correction without defining a new type.
pub struct CorrectionFn<F> {
    func: F,
}

impl<F> CorrectionFn<F>
where
    F: Fn(&LinkEndState<f64>, &LinkEndState<f64>, f64, f64) -> f64,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> LightTimeCorrection for CorrectionFn<F>
where
    F: Fn(&LinkEndState<f64>, &LinkEndState<f64>, f64, f64) -> f64 + Send + Sync,
{
    fn correction_type(&self) -> CorrectionType {
        CorrectionType::FunctionWrapper
    }
    fn light_time_correction(
        &self,
        transmitter: &LinkEndState<f64>,
        receiver: &LinkEndState<f64>,
        transmission_time: f64,
        reception_time: f64,
    ) -> Result<f64, Error> {
        Ok((self.func)(
            transmitter,
            receiver,
            transmission_time,
            reception_time,
        ))
    }
}

/// Fixed signed delay, regardless of geometry.
/// Typically the internal delay of a setup: RF cables, antenna and receiver hardware.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantDelay {
    /// Delay [s]
    pub delay_s: f64,
}

impl ConstantDelay {
    pub fn new(delay_s: f64) -> Self {
        Self { delay_s }
    }
}

impl LightTimeCorrection for ConstantDelay {
    fn correction_type(&self) -> CorrectionType {
        CorrectionType::ConstantDelay
    }
    fn light_time_correction(
        &self,
        _: &LinkEndState<f64>,
        _: &LinkEndState<f64>,
        _: f64,
        _: f64,
    ) -> Result<f64, Error> {
        Ok(self.delay_s)
    }
}

/// Massive body bending the signal path, for [FirstOrderRelativistic].
pub struct PerturbingBody {
    /// Readable name, for logs
    pub name: String,
    /// Gravitational parameter (m^3 s-2)
    pub gm_m3_s2: f64,
    /// Body position [m] as a function of time [s],
    /// in the frame the link end states are expressed in.
    position: Box<dyn Fn(f64) -> Vector3<f64> + Send + Sync>,
}

impl PerturbingBody {
    /// Defines a new [PerturbingBody] from its gravitational parameter (m^3 s-2)
    /// and its position [m] as a function of time [s].
    pub fn new<F>(name: &str, gm_m3_s2: f64, position: F) -> Self
    where
        F: Fn(f64) -> Vector3<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            gm_m3_s2,
            position: Box::new(position),
        }
    }

    /// Defines a new [PerturbingBody] that does not move.
    pub fn fixed(name: &str, gm_m3_s2: f64, position: Vector3<f64>) -> Self {
        Self::new(name, gm_m3_s2, move |_| position)
    }

    /// Returns the body position [m] at requested instant [s].
    pub fn position_at(&self, t: f64) -> Vector3<f64> {
        (self.position)(t)
    }
}

/// First order relativistic (Shapiro) light time correction,
/// summed over a set of [PerturbingBody]s.
pub struct FirstOrderRelativistic {
    bodies: Vec<PerturbingBody>,
    /// PPN parameter gamma (1.0 in general relativity)
    ppn_gamma: f64,
}

/// Shapiro delay [s] caused by a single body, from both link end positions
/// expressed relative to that body.
pub fn first_order_relativistic_delay(
    gm_m3_s2: f64,
    transmitter: &Vector3<f64>,
    receiver: &Vector3<f64>,
    ppn_gamma: f64,
) -> Result<f64, Error> {
    let r_tx = transmitter.norm();
    let r_rx = receiver.norm();
    let r_link = (receiver - transmitter).norm();

    let num = r_tx + r_rx + r_link;
    let denom = r_tx + r_rx - r_link;

    if !(denom > 0.0) {
        return Err(Error::DegenerateGeometry(format!(
            "link passes through the perturbing body (r_tx={:.3} m, r_rx={:.3} m, r_link={:.3} m)",
            r_tx, r_rx, r_link
        )));
    }

    Ok((1.0 + ppn_gamma) * gm_m3_s2 / SPEED_OF_LIGHT_M_S.powi(3) * (num / denom).ln())
}

impl FirstOrderRelativistic {
    /// Builds a new [FirstOrderRelativistic] correction in general relativity.
    pub fn new(bodies: Vec<PerturbingBody>) -> Self {
        Self {
            bodies,
            ppn_gamma: 1.0,
        }
    }

    /// Copies and returns [FirstOrderRelativistic] with updated PPN gamma parameter.
    pub fn with_ppn_gamma(mut self, ppn_gamma: f64) -> Self {
        self.ppn_gamma = ppn_gamma;
        self
    }

    pub fn ppn_gamma(&self) -> f64 {
        self.ppn_gamma
    }

    pub fn bodies(&self) -> &[PerturbingBody] {
        &self.bodies
    }
}

impl LightTimeCorrection for FirstOrderRelativistic {
    fn correction_type(&self) -> CorrectionType {
        CorrectionType::FirstOrderRelativistic
    }
    fn light_time_correction(
        &self,
        transmitter: &LinkEndState<f64>,
        receiver: &LinkEndState<f64>,
        transmission_time: f64,
        reception_time: f64,
    ) -> Result<f64, Error> {
        // bodies are frozen at mid light time
        let t_mid = transmission_time + 0.5 * (reception_time - transmission_time);

        let mut total = 0.0;
        for body in self.bodies.iter() {
            let r_body = body.position_at(t_mid);
            let delay = first_order_relativistic_delay(
                body.gm_m3_s2,
                &(transmitter.position - r_body),
                &(receiver.position - r_body),
                self.ppn_gamma,
            )?;
            trace!("{} - shapiro delay: {:.6E} s", body.name, delay);
            total += delay;
        }
        Ok(total)
    }
}

/// Ordered set of [LightTimeCorrection]s, that behaves as their sum.
#[derive(Default)]
pub struct CorrectionList {
    corrections: Vec<Box<dyn LightTimeCorrection>>,
}

impl CorrectionList {
    pub fn new(corrections: Vec<Box<dyn LightTimeCorrection>>) -> Self {
        Self { corrections }
    }

    /// Appends a new [LightTimeCorrection].
    pub fn push(&mut self, correction: Box<dyn LightTimeCorrection>) {
        self.corrections.push(correction);
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Iterates over the [LightTimeCorrection]s, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn LightTimeCorrection> + '_ {
        self.corrections.iter().map(|c| c.as_ref())
    }
}

impl LightTimeCorrection for CorrectionList {
    fn correction_type(&self) -> CorrectionType {
        CorrectionType::List
    }
    fn light_time_correction(
        &self,
        transmitter: &LinkEndState<f64>,
        receiver: &LinkEndState<f64>,
        transmission_time: f64,
        reception_time: f64,
    ) -> Result<f64, Error> {
        let mut total = 0.0;
        for correction in self.corrections.iter() {
            total += correction.light_time_correction(
                transmitter,
                receiver,
                transmission_time,
                reception_time,
            )?;
        }
        Ok(total)
    }
}
