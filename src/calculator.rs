//! Light time solver
use std::marker::PhantomData;

use log::{debug, error, trace};
use nalgebra::Vector3;

use crate::{
    cfg::Config,
    constants::SPEED_OF_LIGHT_M_S,
    correction::{CorrectionFn, CorrectionList, LightTimeCorrection},
    error::Error,
    scalar::{LinkEndTime, Scalar},
    state::{LinkEnd, LinkEndState, StateProvider},
};

/// Converged light time, and both link end states at their respective instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightTimeSolution<O: Scalar, T: LinkEndTime, S: Scalar> {
    /// Light time [s], corrections included
    pub light_time: O,
    /// Transmitter state at transmission
    pub transmitter: LinkEndState<S>,
    /// Receiver state at reception
    pub receiver: LinkEndState<S>,
    /// Transmission instant
    pub transmission_epoch: T,
    /// Reception instant
    pub reception_epoch: T,
    /// Sum of all corrections [s] contained in the light time
    pub correction_s: f64,
    /// Iterations that were needed
    pub iterations: usize,
}

impl<O: Scalar, T: LinkEndTime, S: Scalar> LightTimeSolution<O, T, S> {
    /// Vector [m] from the transmitter at transmission to the receiver at reception.
    pub fn relative_range_vector(&self) -> Vector3<S> {
        self.receiver.position - self.transmitter.position
    }
}

/// [LightTimeCalculator] solves the light time between two moving link ends,
/// taking into account any number of [LightTimeCorrection]s
/// (relativistic, atmospheric, hardware..).
///
/// - `O` is the light time (observation) scalar type
/// - `T` is the time type the link end states are evaluated at
/// - `S` is the link end state scalar type
///
/// Corrections are always evaluated in double precision.
/// A [LightTimeCalculator] is built once per link and reused for any number
/// of epochs. Solving does not mutate it.
pub struct LightTimeCalculator<O: Scalar = f64, T: LinkEndTime = f64, S: Scalar = O> {
    /// Transmitter [StateProvider]
    transmitter: Box<dyn StateProvider<T, S>>,
    /// Receiver [StateProvider]
    receiver: Box<dyn StateProvider<T, S>>,
    /// Corrections, i.e. relativistic, tropospheric..
    corrections: CorrectionList,
    /// Solver parametrization
    cfg: Config,
    _observable: PhantomData<O>,
}

impl<O: Scalar, T: LinkEndTime, S: Scalar> LightTimeCalculator<O, T, S> {
    /// Creates a new [LightTimeCalculator] from both link end [StateProvider]s,
    /// without correction and with default [Config].
    pub fn new<Tx, Rx>(transmitter: Tx, receiver: Rx) -> Self
    where
        Tx: StateProvider<T, S> + 'static,
        Rx: StateProvider<T, S> + 'static,
    {
        Self {
            transmitter: Box::new(transmitter),
            receiver: Box::new(receiver),
            corrections: CorrectionList::default(),
            cfg: Config::default(),
            _observable: PhantomData,
        }
    }

    /// Returns [LightTimeCalculator] with updated [Config].
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns [LightTimeCalculator] with corrections recalculated at every iteration (or not).
    pub fn with_iterated_corrections(mut self, iterate: bool) -> Self {
        self.cfg.iterate_corrections = iterate;
        self
    }

    /// Returns [LightTimeCalculator] with one more [LightTimeCorrection].
    pub fn with_correction<C: LightTimeCorrection + 'static>(mut self, correction: C) -> Self {
        self.corrections.push(Box::new(correction));
        self
    }

    /// Returns [LightTimeCalculator] with one more correction, defined
    /// as a plain function of (transmitter, receiver, t_tx [s], t_rx [s]).
    pub fn with_correction_fn<F>(self, func: F) -> Self
    where
        F: Fn(&LinkEndState<f64>, &LinkEndState<f64>, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.with_correction(CorrectionFn::new(func))
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn corrections(&self) -> &CorrectionList {
        &self.corrections
    }

    /// Tolerance [s] applied when none is specified: [Config] value if defined,
    /// otherwise the looser of the observation and state scalar defaults.
    pub fn default_tolerance(&self) -> O {
        if let Some(tolerance) = self.cfg.tolerance {
            return O::from_double(tolerance);
        }
        let observation = O::default_light_time_tolerance();
        let state = O::from_double(S::default_light_time_tolerance().to_double());
        if observation > state {
            observation
        } else {
            state
        }
    }

    /// Solves the light time and both link end states.
    /// ## Inputs
    /// - epoch: query instant
    /// - fixed: [LinkEnd] the query instant applies to. [LinkEnd::Receiver]
    ///   means the epoch is the reception instant, and the transmission instant is
    ///   solved for. [LinkEnd::Transmitter] is the symmetric case.
    /// - tolerance: maximal light time difference [s] between two successive iterations.
    ///   Uses [Self::default_tolerance] when undefined.
    pub fn solve(
        &self,
        epoch: T,
        fixed: LinkEnd,
        tolerance: Option<O>,
    ) -> Result<LightTimeSolution<O, T, S>, Error> {
        self.cfg.validate()?;
        let tolerance = tolerance.unwrap_or_else(|| self.default_tolerance());

        // zero light time initial guess
        let mut t_tx = epoch;
        let mut t_rx = epoch;
        let mut transmitter = self.transmitter.state_at(t_tx)?;
        let mut receiver = self.receiver.state_at(t_rx)?;

        let mut correction = self.total_correction(&transmitter, &receiver, t_tx, t_rx)?;

        // infinite signal speed estimate
        let mut previous = Self::light_time_estimate(&transmitter, &receiver, correction);
        Self::check_finite(previous, epoch, 0)?;
        let mut light_time;

        // nothing to settle without any correction
        let mut update_corrections = self.cfg.iterate_corrections || self.corrections.is_empty();

        let mut residual = O::zero();
        let mut iteration = 0;

        loop {
            if iteration == self.cfg.max_iterations {
                error!(
                    "{} ({}) light time unconverged at level {:.3E} s (correction: {:.3E} s)",
                    epoch,
                    fixed,
                    residual.to_double(),
                    correction
                );
                return Err(Error::LightTimeNonConvergence {
                    residual_s: residual.to_double(),
                    correction_s: correction,
                    epoch: epoch.to_string(),
                    iterations: iteration,
                });
            }

            iteration += 1;

            if update_corrections {
                correction = self.total_correction(&transmitter, &receiver, t_tx, t_rx)?;
            }

            match fixed {
                LinkEnd::Receiver => {
                    t_tx = epoch.offset_seconds(-previous.to_double());
                    transmitter = self.transmitter.state_at(t_tx)?;
                },
                LinkEnd::Transmitter => {
                    t_rx = epoch.offset_seconds(previous.to_double());
                    receiver = self.receiver.state_at(t_rx)?;
                },
            }

            light_time = Self::light_time_estimate(&transmitter, &receiver, correction);
            Self::check_finite(light_time, epoch, iteration)?;
            residual = (light_time - previous).abs();

            trace!(
                "{} ({}) iteration #{} - light time: {:.12E} s - residual: {:.3E} s",
                epoch,
                fixed,
                iteration,
                light_time.to_double(),
                residual.to_double()
            );

            if residual < tolerance {
                if update_corrections {
                    break;
                }
                // converged on a correction that was never updated:
                // one more iteration to verify it still holds
                debug!("{} ({}) settling light time corrections", epoch, fixed);
                update_corrections = true;
            } else {
                previous = light_time;
            }
        }

        debug!(
            "{} ({}) light time: {:.12E} s (correction: {:.3E} s, {} iterations)",
            epoch,
            fixed,
            light_time.to_double(),
            correction,
            iteration
        );

        Ok(LightTimeSolution {
            light_time,
            transmitter,
            receiver,
            transmission_epoch: t_tx,
            reception_epoch: t_rx,
            correction_s: correction,
            iterations: iteration,
        })
    }

    /// Solves and only returns the light time [s]. See [Self::solve].
    pub fn light_time(&self, epoch: T, fixed: LinkEnd, tolerance: Option<O>) -> Result<O, Error> {
        Ok(self.solve(epoch, fixed, tolerance)?.light_time)
    }

    /// Solves and returns the vector [m] from the transmitter at transmission
    /// to the receiver at reception. See [Self::solve].
    pub fn relative_range_vector(
        &self,
        epoch: T,
        fixed: LinkEnd,
        tolerance: Option<O>,
    ) -> Result<Vector3<S>, Error> {
        Ok(self.solve(epoch, fixed, tolerance)?.relative_range_vector())
    }

    /// Light time estimate [s] from both link end states and current correction.
    fn light_time_estimate(
        transmitter: &LinkEndState<S>,
        receiver: &LinkEndState<S>,
        correction: f64,
    ) -> O {
        let range = (receiver.position - transmitter.position)
            .map(|x| O::from_double(x.to_double()));
        range.norm() / O::from_double(SPEED_OF_LIGHT_M_S) + O::from_double(correction)
    }

    /// Non finite estimates would propagate to the link end instants.
    fn check_finite(light_time: O, epoch: T, iteration: usize) -> Result<(), Error> {
        if light_time.to_double().is_finite() {
            Ok(())
        } else {
            error!("{} light time estimate #{} is not finite", epoch, iteration);
            Err(Error::NonFiniteLightTime {
                epoch: epoch.to_string(),
                iteration,
            })
        }
    }

    /// Sum of all corrections [s], evaluated in double precision.
    fn total_correction(
        &self,
        transmitter: &LinkEndState<S>,
        receiver: &LinkEndState<S>,
        t_tx: T,
        t_rx: T,
    ) -> Result<f64, Error> {
        self.corrections.light_time_correction(
            &transmitter.cast(),
            &receiver.cast(),
            t_tx.to_seconds(),
            t_rx.to_seconds(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixed_link(d: f64) -> LightTimeCalculator {
        LightTimeCalculator::new(
            |_: f64| LinkEndState::from_position(Vector3::zeros()),
            move |_: f64| LinkEndState::from_position(Vector3::new(d, 0.0, 0.0)),
        )
    }

    #[test]
    fn default_tolerance() {
        let calc = fixed_link(1.0);
        assert_eq!(calc.default_tolerance(), 1.0E-12);

        let calc = calc.with_config(Config::default().with_tolerance(1.0E-9));
        assert_eq!(calc.default_tolerance(), 1.0E-9);

        let calc: LightTimeCalculator<f64, f64, f32> = LightTimeCalculator::new(
            |_: f64| LinkEndState::<f32>::default(),
            |_: f64| LinkEndState::<f32>::default(),
        );
        assert_eq!(calc.default_tolerance(), 1.0E-6_f32 as f64);
    }

    #[test]
    fn builder() {
        let calc = fixed_link(1.0)
            .with_iterated_corrections(true)
            .with_correction_fn(|_, _, _, _| 1.0E-9);
        assert!(calc.config().iterate_corrections);
        assert_eq!(calc.corrections().len(), 1);
    }

    #[test]
    fn invalid_config() {
        let calc = fixed_link(1.0).with_config(Config::default().with_max_iterations(0));
        assert!(matches!(
            calc.solve(0.0, LinkEnd::Receiver, None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn range_vector() {
        let calc = fixed_link(3.0E8);
        let range = calc
            .relative_range_vector(0.0, LinkEnd::Receiver, None)
            .unwrap();
        assert_eq!(range, Vector3::new(3.0E8, 0.0, 0.0));
    }
}
