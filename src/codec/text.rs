//! Human-readable log line formatting and parsing.
//!
//! Saved raw logs are plain text, one sample per line:
//!
//! ```text
//! P: 100985 T: 21.25 B: 4.15 S: 1500
//! ```
//!
//! Files are routinely hand-edited, so parsing never fails: a blank or
//! garbage line degrades to the session-end marker instead of an error.

use crate::sample::Sample;

/// Format a sample as a raw log line.
pub fn format_line(sample: &Sample) -> String {
    format!(
        "P: {} T: {} B: {} S: {}",
        sample.pressure, sample.temperature, sample.battery, sample.servo
    )
}

/// Format a sample in the scaled integer encoding used when re-uploading
/// a selection to the device.
///
/// Temperature and battery are sent as hundredths so the device side can
/// parse them without floating point. This encoding is write-only; there
/// is no corresponding parser.
pub fn format_upload_line(sample: &Sample) -> String {
    format!(
        "P: {} T: {} B: {} S: {}",
        sample.pressure,
        (sample.temperature * 100.0) as i64,
        (sample.battery * 100.0) as i64,
        sample.servo
    )
}

/// Parse a raw log line.
///
/// Splits on `:` and spaces; anything that does not yield the expected
/// tokens (blank lines, comments, truncated lines) parses as the
/// session-end marker.
pub fn parse_line(line: &str) -> Sample {
    let tokens: Vec<&str> = line.split([':', ' ']).collect();
    // "P: <p> T: <t> B: <b>" is 9 tokens; servo is optional for files
    // written before the servo channel existed.
    if tokens.len() < 9 {
        return Sample::SESSION_END;
    }

    let pressure = tokens[2].parse::<i32>();
    let temperature = tokens[5].parse::<f64>();
    let battery = tokens[8].parse::<f64>();
    let servo = match tokens.get(11) {
        Some(t) => t.parse::<i32>(),
        None => Ok(0),
    };

    match (pressure, temperature, battery, servo) {
        (Ok(pressure), Ok(temperature), Ok(battery), Ok(servo)) => Sample {
            pressure,
            temperature,
            battery,
            servo,
        },
        _ => Sample::SESSION_END,
    }
}
