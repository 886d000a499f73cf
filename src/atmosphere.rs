//! Standard-atmosphere pressure to altitude conversion.
//!
//! Altitudes are always computed relative to a locally-averaged base
//! pressure rather than sea level, so a log that starts on a hilltop still
//! starts at zero metres.

/// Standard sea-level pressure in Pa.
pub const STANDARD_PRESSURE_PA: f64 = 101325.0;

/// Exponent of the barometric formula for the troposphere.
const BAROMETRIC_EXPONENT: f64 = 0.190263;

/// Scale height term of the barometric formula, in metres.
const BAROMETRIC_SCALE_M: f64 = 44330.8;

/// Convert an absolute pressure to altitude in metres relative to a
/// reference pressure.
pub fn altitude_m_from_pressure(pressure: f64, base_pressure: f64) -> f64 {
    (1.0 - (pressure / base_pressure).powf(BAROMETRIC_EXPONENT)) * BAROMETRIC_SCALE_M
}

/// Convert metres to feet (for presentation layers that plot in feet).
pub fn feet_from_m(m: f64) -> f64 {
    m * 3.2808399
}
