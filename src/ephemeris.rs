//! Ephemeris update ordering.
//!
//! Each integrated body has its state defined with respect to a central body,
//! and its external ephemeris expressed with respect to an ephemeris origin.
//! Whenever either one is integrated as well, it must be updated first.
use itertools::izip;
use log::{debug, error, trace};

use crate::{constants::MAX_EPHEMERIS_RESOLUTION_STEPS, error::Error};

/// Dependencies of one integrated body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDependency {
    /// Integrated body
    pub body: String,
    /// Body the state is defined against
    pub central_body: String,
    /// Body the ephemeris is expressed in
    pub ephemeris_origin: String,
}

/// Set of integrated bodies and their dependencies,
/// from which the ephemeris update order is determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EphemerisDependencies {
    entries: Vec<BodyDependency>,
}

impl EphemerisDependencies {
    /// Builds [EphemerisDependencies] from three positionally aligned lists:
    /// entry #i of each list describes the same body.
    pub fn new<A, B, C>(
        integrated_bodies: &[A],
        central_bodies: &[B],
        ephemeris_origins: &[C],
    ) -> Result<Self, Error>
    where
        A: AsRef<str>,
        B: AsRef<str>,
        C: AsRef<str>,
    {
        let (integrated, central, origins) = (
            integrated_bodies.len(),
            central_bodies.len(),
            ephemeris_origins.len(),
        );

        if integrated != central || integrated != origins {
            return Err(Error::MisalignedDependencies {
                integrated,
                central,
                origins,
            });
        }

        let entries = izip!(integrated_bodies, central_bodies, ephemeris_origins)
            .map(|(body, central, origin)| {
                let (body, central, origin): (&str, &str, &str) =
                    (body.as_ref(), central.as_ref(), origin.as_ref());
                BodyDependency {
                    body: body.to_string(),
                    central_body: central.to_string(),
                    ephemeris_origin: origin.to_string(),
                }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Adds one more integrated body.
    pub fn push(&mut self, body: &str, central_body: &str, ephemeris_origin: &str) {
        self.entries.push(BodyDependency {
            body: body.to_string(),
            central_body: central_body.to_string(),
            ephemeris_origin: ephemeris_origin.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyDependency> + '_ {
        self.entries.iter()
    }

    /// Index of the first pending entry integrating `name`, if any.
    fn pending_index(&self, name: &str, resolved: &[bool]) -> Option<usize> {
        self.entries
            .iter()
            .zip(resolved)
            .position(|(entry, done)| !done && entry.body == name)
    }

    /// Determines the order in which the ephemerides are to be updated:
    /// every body comes after the integrated bodies it depends on.
    /// Fails with [Error::UnresolvableDependencies] on cyclic input,
    /// a body being its own central body included.
    pub fn update_order(&self) -> Result<Vec<String>, Error> {
        let mut order = Vec::with_capacity(self.entries.len());
        let mut resolved = vec![false; self.entries.len()];
        let mut pending = self.entries.len();

        let mut current = 0;
        let mut steps = 0;

        while pending > 0 {
            let entry = &self.entries[current];

            let central = self.pending_index(&entry.central_body, &resolved);
            let origin = self.pending_index(&entry.ephemeris_origin, &resolved);

            match (central, origin) {
                (None, None) => {
                    trace!("{} - no pending dependency", entry.body);
                    order.push(entry.body.clone());
                    resolved[current] = true;
                    pending -= 1;
                    // restart from the first pending entry
                    current = resolved.iter().position(|done| !done).unwrap_or(0);
                },
                (Some(central), Some(origin)) => {
                    current = central.min(origin);
                },
                (Some(index), None) | (None, Some(index)) => {
                    current = index;
                },
            }

            steps += 1;

            if pending > 0 && steps >= MAX_EPHEMERIS_RESOLUTION_STEPS {
                error!(
                    "ephemeris update order undetermined after {} steps ({} bodies pending)",
                    steps, pending
                );
                return Err(Error::UnresolvableDependencies(steps));
            }
        }

        debug!("ephemeris update order: {:?} ({} steps)", order, steps);
        Ok(order)
    }
}

/// Determines the ephemeris update order from three positionally aligned lists,
/// see [EphemerisDependencies::update_order].
pub fn resolve_ephemeris_update_order<A, B, C>(
    integrated_bodies: &[A],
    central_bodies: &[B],
    ephemeris_origins: &[C],
) -> Result<Vec<String>, Error>
where
    A: AsRef<str>,
    B: AsRef<str>,
    C: AsRef<str>,
{
    EphemerisDependencies::new(integrated_bodies, central_bodies, ephemeris_origins)?
        .update_order()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn misaligned() {
        let err = EphemerisDependencies::new(&["Earth", "Moon"], &["Sun"], &["SSB", "SSB"]);
        assert_eq!(
            err,
            Err(Error::MisalignedDependencies {
                integrated: 2,
                central: 1,
                origins: 2,
            })
        );
    }

    #[test]
    fn empty() {
        let deps = EphemerisDependencies::default();
        assert!(deps.is_empty());
        assert_eq!(deps.update_order(), Ok(vec![]));
    }

    #[test]
    fn push() {
        let mut deps = EphemerisDependencies::default();
        deps.push("Moon", "Earth", "SSB");
        deps.push("Earth", "Sun", "SSB");
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.iter().next().unwrap().central_body, "Earth");
        assert_eq!(deps.update_order().unwrap(), vec!["Earth", "Moon"]);
    }

    #[test]
    fn self_reference() {
        let err = resolve_ephemeris_update_order(&["Sat"], &["Sat"], &["SSB"]);
        assert_eq!(
            err,
            Err(Error::UnresolvableDependencies(MAX_EPHEMERIS_RESOLUTION_STEPS))
        );
    }
}
