//! The decoded telemetry sample and its sentinel semantics.
//!
//! A logger writes one fixed-size record per sample interval. Power-cycles
//! and memory erases leave a run of empty records behind; these decode to a
//! session-end marker with `pressure == PRESSURE_EMPTY_DATA`, after which
//! pressure calibration must restart.

use serde::{Deserialize, Serialize};

/// Pressure value marking a session boundary ("EOF" record).
///
/// True atmospheric pressure is never negative, so -1 is unambiguous.
pub const PRESSURE_EMPTY_DATA: i32 = -1;

/// One decoded logger reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute pressure in Pa, or [`PRESSURE_EMPTY_DATA`]
    pub pressure: i32,
    /// Temperature in degrees C (0.25 degree steps in the V1 format)
    pub temperature: f64,
    /// Battery voltage in V (0.05 V steps in the V1 format)
    pub battery: f64,
    /// Servo pulse width in microseconds, 0 when no pulse was seen
    pub servo: i32,
}

impl Sample {
    /// The canonical session-boundary marker.
    pub const SESSION_END: Sample = Sample {
        pressure: PRESSURE_EMPTY_DATA,
        temperature: -1.0,
        battery: -1.0,
        servo: -1,
    };

    /// Create a sample from already-converted physical values.
    pub fn new(pressure: i32, temperature: f64, battery: f64, servo: i32) -> Self {
        Sample {
            pressure,
            temperature,
            battery,
            servo,
        }
    }

    /// Check whether this sample marks a session boundary.
    ///
    /// Only the pressure field is significant; the other fields of a
    /// boundary sample carry no information.
    pub fn is_session_end(&self) -> bool {
        self.pressure == PRESSURE_EMPTY_DATA
    }
}
