//! Binary record layouts and their conversion to physical units.
//!
//! All formats are little-endian, matching the AVR firmware that writes
//! them. Fixed-layout records are deserialized into `#[repr(C, packed)]`
//! byte-array structs and converted field by field.

use serde::Deserialize;

use crate::error::DecodeError;
use crate::sample::Sample;

// =============================================================================
// V1 Format (current, 5 bytes)
// =============================================================================

/// Pressure stored in a V1 record is an offset from standard sea level.
pub const V1_PRESSURE_BIAS: i32 = 101325;

/// V1 record layout.
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
struct RawRecordV1 {
    /// Signed pressure offset from 101325 Pa
    pressure: [u8; 2],
    /// Temperature in 0.25 C steps from -15 C
    temperature: u8,
    /// Battery voltage in 0.05 V steps from 2.0 V
    battery: u8,
    /// Servo pulse width in 8 us steps from 500 us, 0 = no pulse
    servo: u8,
}

/// Decode a V1 record (caller has checked the length).
pub(super) fn decode_v1(record: &[u8]) -> Result<Sample, DecodeError> {
    let raw: RawRecordV1 = bincode::deserialize(record)?;
    let pressure_raw = i16::from_le_bytes(raw.pressure);

    // An erased flash record reads back as all ones.
    if pressure_raw == -1 && raw.temperature == 255 && raw.battery == 255 {
        return Ok(Sample::SESSION_END);
    }

    Ok(Sample {
        pressure: pressure_raw as i32 + V1_PRESSURE_BIAS,
        temperature: (raw.temperature as f64 * 2.5 - 150.0) / 10.0,
        battery: 2.0 + 0.05 * raw.battery as f64,
        servo: if raw.servo == 0 {
            0
        } else {
            raw.servo as i32 * 8 + 500
        },
    })
}

/// Encode a sample as a V1 record.
///
/// This is the inverse of the V1 decode and is only needed when writing a
/// selection back to a device image. Values that do not fit the quantized
/// wire fields are an error rather than being clamped.
pub fn encode(sample: &Sample) -> Result<[u8; 5], DecodeError> {
    if sample.is_session_end() {
        return Ok([0xFF; 5]);
    }

    let delta = sample.pressure - V1_PRESSURE_BIAS;
    let pressure_raw =
        i16::try_from(delta).map_err(|_| DecodeError::OutOfRange {
            field: "pressure",
            value: sample.pressure as i64,
        })?;

    let temperature_raw = (sample.temperature * 10.0 + 150.0) / 2.5;
    if !(0.0..=255.0).contains(&temperature_raw) {
        return Err(DecodeError::OutOfRange {
            field: "temperature",
            value: sample.temperature as i64,
        });
    }

    let battery_raw = (sample.battery - 2.0) / 0.05;
    if !(0.0..=255.0).contains(&battery_raw) {
        return Err(DecodeError::OutOfRange {
            field: "battery",
            value: sample.battery as i64,
        });
    }

    let servo_raw = if sample.servo == 0 {
        0
    } else {
        let steps = (sample.servo - 500) / 8;
        if !(1..=255).contains(&steps) {
            return Err(DecodeError::OutOfRange {
                field: "servo",
                value: sample.servo as i64,
            });
        }
        steps as u8
    };

    let pressure_bytes = pressure_raw.to_le_bytes();
    Ok([
        pressure_bytes[0],
        pressure_bytes[1],
        temperature_raw.round() as u8,
        battery_raw.round() as u8,
        servo_raw,
    ])
}

// =============================================================================
// Legacy-A Format (12 bytes)
// =============================================================================

/// Legacy-A record layout: three raw 32-bit fields.
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
struct RawRecordLegacyA {
    /// Absolute pressure in Pa, signed
    pressure: [u8; 4],
    /// Temperature in 0.1 C steps, signed
    temperature: [u8; 4],
    /// Battery voltage as an IEEE-754 float
    battery: [u8; 4],
}

pub(super) fn decode_legacy_a(record: &[u8]) -> Result<Sample, DecodeError> {
    let raw: RawRecordLegacyA = bincode::deserialize(record)?;
    let pressure = i32::from_le_bytes(raw.pressure);
    if pressure == crate::sample::PRESSURE_EMPTY_DATA {
        return Ok(Sample::SESSION_END);
    }
    Ok(Sample {
        pressure,
        temperature: i32::from_le_bytes(raw.temperature) as f64 / 10.0,
        battery: f32::from_le_bytes(raw.battery) as f64,
        // Legacy-A loggers had no servo input
        servo: 0,
    })
}

// =============================================================================
// Legacy-B Format (packed, 5 bytes)
// =============================================================================

/// Pressure field value marking an empty Legacy-B record.
const LEGACY_B_PRESSURE_EMPTY: u32 = 0x1FFFF;

pub(super) fn decode_legacy_b(record: &[u8]) -> Result<Sample, DecodeError> {
    let word = u32::from_le_bytes(record[0..4].try_into().unwrap());

    // Packed word: pressure in the top 17 bits, battery in the middle
    // 8 bits, temperature in the low 7 bits.
    let pressure = word >> 15;
    if pressure >= LEGACY_B_PRESSURE_EMPTY {
        return Ok(Sample::SESSION_END);
    }

    Ok(Sample {
        pressure: pressure as i32,
        temperature: (word & 0x7F) as f64 / 2.0 - 10.0,
        battery: ((word >> 7) & 0xFF) as f64 / 20.0 + 2.0,
        servo: record[4] as i8 as i32,
    })
}

// =============================================================================
// Tests
// =============================================================================
