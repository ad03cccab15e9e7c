use anise::constants::SPEED_OF_LIGHT_KM_S;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// Sun gravitational constant (m^3 s-2)
pub const SUN_GRAVITATION_MU_M3_S2: f64 = 1.327124E20;

/// Earth gravitational constant (m^3 s-2)
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = 3.986004E14;

/// Earth's moon gravitational constant (m^3 s-2)
pub const MOON_GRAVITATION_MU_M3_S2: f64 = 4.902E12;

/// Light time iterations we allow before declaring the solution unconverged.
/// The settling iteration counts towards this limit.
pub const MAX_LIGHT_TIME_ITERATIONS: usize = 20;

/// Ephemeris update order resolution steps we allow before declaring
/// the dependency graph cyclic.
pub const MAX_EPHEMERIS_RESOLUTION_STEPS: usize = 10_000;

/// Default light time tolerance [s] for double precision scalars
pub const DEFAULT_LIGHT_TIME_TOLERANCE_F64: f64 = 1.0E-12;

/// Default light time tolerance [s] for single precision scalars
pub const DEFAULT_LIGHT_TIME_TOLERANCE_F32: f64 = 1.0E-6;
