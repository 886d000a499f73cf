//! The flight log aggregate.
//!
//! A [`FlightLog`] owns the ordered sample sequence downloaded from a
//! logger (or loaded from a saved text file) and derives the altitude
//! series from raw pressure. A single log routinely spans several
//! power-cycles of the device; each session boundary resets the base
//! pressure calibration so every session starts at zero altitude.

use log::debug;
use serde::Serialize;

use crate::atmosphere;
use crate::codec::{self, text, RecordFormat};
use crate::error::DecodeError;
use crate::sample::{Sample, PRESSURE_EMPTY_DATA};

/// Nominal sample interval in seconds, used unless a text header
/// overrides it.
pub const DEFAULT_LOG_INTERVAL: f64 = 0.5;

/// Number of consecutive valid samples averaged for the base pressure.
const BASE_PRESSURE_SAMPLES: usize = 20;

/// Header key for the sample interval in saved text logs.
const LOG_INTERVAL_HEADER: &str = "logInterval:";

/// An ordered sample sequence with its derived altitude series.
#[derive(Debug, Clone, Serialize)]
pub struct FlightLog {
    samples: Vec<Sample>,
    altitude_m: Vec<f64>,
    log_interval: f64,
}

impl Default for FlightLog {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightLog {
    /// Create an empty log with the default sample interval.
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_LOG_INTERVAL)
    }

    /// Create an empty log with an explicit sample interval in seconds.
    pub fn with_interval(log_interval: f64) -> Self {
        FlightLog {
            samples: Vec::new(),
            altitude_m: Vec::new(),
            log_interval,
        }
    }

    /// Decode a contiguous run of binary records into a log.
    ///
    /// The buffer must contain whole records only; a trailing partial
    /// record is an error, not silence.
    pub fn from_bytes(data: &[u8], format: RecordFormat) -> Result<Self, DecodeError> {
        let size = format.size();
        let mut log = FlightLog::new();
        let mut offset = 0;
        while offset + size <= data.len() {
            log.samples.push(codec::decode(data, offset, format)?);
            offset += size;
        }
        if offset != data.len() {
            return Err(DecodeError::TooShort {
                expected: offset + size,
                actual: data.len(),
            });
        }
        log.compute_altitudes();
        Ok(log)
    }

    /// Load a log from saved text.
    ///
    /// An optional `#logInterval: <secs>` header overrides the default
    /// sample interval; other `#` lines are ignored. Data lines parse per
    /// [`text::parse_line`], so hand-edited garbage degrades to session
    /// markers instead of failing the whole file.
    pub fn from_text(raw: &str) -> Self {
        let mut log = FlightLog::new();
        for line in raw.lines() {
            if let Some(header) = line.strip_prefix('#') {
                if let Some(value) = header.trim().strip_prefix(LOG_INTERVAL_HEADER) {
                    if let Ok(interval) = value.trim().parse::<f64>() {
                        log.log_interval = interval;
                    }
                }
                continue;
            }
            log.samples.push(text::parse_line(line));
        }
        log.compute_altitudes();
        log
    }

    /// Serialize the log as saved text: the interval header followed by
    /// every sample, including session markers, in original order.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("#{} {}\r\n", LOG_INTERVAL_HEADER, self.log_interval));
        for sample in &self.samples {
            out.push_str(&text::format_line(sample));
            out.push_str("\r\n");
        }
        out
    }

    /// Serialize the samples in the scaled upload encoding for re-writing
    /// a selection to the device. Write-only; never parsed back.
    pub fn to_upload_text(&self, from: usize, to: usize) -> String {
        let to = to.min(self.samples.len());
        let from = from.min(to);
        let mut out = String::new();
        for sample in &self.samples[from..to] {
            out.push_str(&text::format_upload_line(sample));
            out.push_str("\r\n");
        }
        out
    }

    /// Serialize the processed log (samples, altitude, interval) as JSON
    /// for the presentation layer's "save processed" export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Append a sample. Call [`FlightLog::compute_altitudes`] after the
    /// sample set stops changing.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample interval in seconds; `time(i) = i * log_interval`.
    pub fn log_interval(&self) -> f64 {
        self.log_interval
    }

    pub fn set_log_interval(&mut self, log_interval: f64) {
        self.log_interval = log_interval;
    }

    // -------------------------------------------------------------------------
    // Altitude derivation
    // -------------------------------------------------------------------------

    /// Average the pressure of up to [`BASE_PRESSURE_SAMPLES`] consecutive
    /// valid samples starting at `start`, stopping at the first session
    /// marker.
    ///
    /// Returns `None` when the window holds no valid sample at all, so a
    /// degenerate window can never put a NaN into the altitude series.
    pub fn base_pressure(&self, start: usize) -> Option<f64> {
        let mut count = 0usize;
        let mut sum = 0.0;
        for sample in self
            .samples
            .iter()
            .skip(start)
            .take(BASE_PRESSURE_SAMPLES)
        {
            if sample.pressure == PRESSURE_EMPTY_DATA {
                break;
            }
            count += 1;
            sum += sample.pressure as f64;
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Recompute the altitude series from the raw pressure data.
    ///
    /// The base pressure starts unset, is calibrated from the first valid
    /// sample's averaging window, and is reset by every session marker so
    /// the next session recalibrates from scratch. Session markers
    /// themselves sit at altitude zero.
    pub fn compute_altitudes(&mut self) {
        let mut altitude = vec![0.0; self.samples.len()];
        let mut base: Option<f64> = None;
        for i in 0..self.samples.len() {
            if self.samples[i].pressure != PRESSURE_EMPTY_DATA {
                if base.is_none() {
                    base = self.base_pressure(i);
                    if let Some(bp) = base {
                        debug!("base pressure {bp:.1} Pa calibrated at sample {i}");
                    }
                }
                if let Some(bp) = base {
                    altitude[i] =
                        atmosphere::altitude_m_from_pressure(self.samples[i].pressure as f64, bp);
                }
            } else {
                base = None;
            }
        }
        self.altitude_m = altitude;
    }

    // -------------------------------------------------------------------------
    // Derived series
    // -------------------------------------------------------------------------

    /// Altitude in metres, one entry per sample.
    pub fn altitude(&self) -> &[f64] {
        &self.altitude_m
    }

    /// Altitude in feet, for presentation layers that plot imperial.
    pub fn altitude_ft(&self) -> Vec<f64> {
        self.altitude_m
            .iter()
            .map(|&m| atmosphere::feet_from_m(m))
            .collect()
    }

    /// Raw pressure channel in Pa (session markers keep their -1).
    pub fn pressure(&self) -> Vec<i32> {
        self.samples.iter().map(|s| s.pressure).collect()
    }

    /// Battery voltage with the last valid reading carried across session
    /// markers, so a multi-session plot has no spurious drops to zero.
    pub fn battery_carried(&self) -> Vec<f64> {
        self.carried(|s| s.battery)
    }

    /// Temperature with the last valid reading carried across session
    /// markers.
    pub fn temperature_carried(&self) -> Vec<f64> {
        self.carried(|s| s.temperature)
    }

    /// Servo pulse width in microseconds, one entry per sample.
    pub fn servo(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.servo as f64).collect()
    }

    fn carried(&self, field: impl Fn(&Sample) -> f64) -> Vec<f64> {
        let mut last = 0.0;
        let mut out = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            if sample.pressure != PRESSURE_EMPTY_DATA {
                last = field(sample);
            }
            out.push(last);
        }
        out
    }

    /// Indices of the session boundary markers, in order.
    pub fn session_boundary_indices(&self) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_session_end())
            .map(|(i, _)| i)
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pressure_sample(pressure: i32) -> Sample {
        Sample::new(pressure, 20.0, 4.0, 0)
    }

    #[test]
    fn test_text_round_trip() {
        let mut log = FlightLog::with_interval(0.25);
        log.append(Sample::new(101325, 21.25, 4.15, 1500));
        log.append(Sample::SESSION_END);
        log.append(Sample::new(101200, -3.5, 3.9, 0));
        log.compute_altitudes();

        let text = log.to_text();
        assert!(text.starts_with("#logInterval: 0.25\r\n"));

        let back = FlightLog::from_text(&text);
        assert_eq!(back.samples(), log.samples());
        assert_eq!(back.log_interval(), 0.25);
    }

    #[test]
    fn test_from_text_tolerates_garbage_lines() {
        let text = "#someFutureHeader: 1\nP: 101325 T: 20 B: 4 S: 0\n\nnot a data line\n";
        let log = FlightLog::from_text(text);
        assert_eq!(log.len(), 3);
        assert!(!log.samples()[0].is_session_end());
        assert!(log.samples()[1].is_session_end());
        assert!(log.samples()[2].is_session_end());
        assert_eq!(log.log_interval(), DEFAULT_LOG_INTERVAL);
    }

    #[test]
    fn test_from_bytes() {
        let mut data = vec![0x00, 0x00, 100, 42, 0];
        data.extend_from_slice(&[0xFF; 5]);
        let log = FlightLog::from_bytes(&data, RecordFormat::V1).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.samples()[0].pressure, 101325);
        assert!(log.samples()[1].is_session_end());
    }

    #[test]
    fn test_from_bytes_rejects_partial_record() {
        let data = [0u8; 7];
        assert!(matches!(
            FlightLog::from_bytes(&data, RecordFormat::V1),
            Err(DecodeError::TooShort { .. })
        ));
    }

    #[test]
    fn test_altitude_zero_at_single_sample_window() {
        // One valid sample followed by a marker: the calibration window is
        // exactly that sample, so its altitude is zero.
        let mut log = FlightLog::new();
        log.append(pressure_sample(100000));
        log.append(Sample::SESSION_END);
        log.compute_altitudes();
        assert_eq!(log.altitude()[0], 0.0);
        assert_eq!(log.altitude()[1], 0.0);
    }

    #[test]
    fn test_base_pressure_window_stops_at_marker() {
        let mut log = FlightLog::new();
        log.append(pressure_sample(100000));
        log.append(pressure_sample(100100));
        log.append(Sample::SESSION_END);
        log.append(pressure_sample(90000));
        assert_eq!(log.base_pressure(0), Some(100050.0));
        assert_eq!(log.base_pressure(2), None);
        assert_eq!(log.base_pressure(3), Some(90000.0));
    }

    #[test]
    fn test_session_reset_recalibrates() {
        // Two sessions at very different ground pressures: each starts at
        // zero altitude because the marker resets calibration.
        let mut log = FlightLog::new();
        for _ in 0..20 {
            log.append(pressure_sample(101000));
        }
        log.append(Sample::SESSION_END);
        for _ in 0..20 {
            log.append(pressure_sample(95000));
        }
        log.compute_altitudes();
        assert!(log.altitude()[0].abs() < 1e-9);
        assert_eq!(log.altitude()[20], 0.0);
        assert!(log.altitude()[21].abs() < 1e-9);
    }

    #[test]
    fn test_altitude_uses_windowed_average() {
        // Base pressure averages the first 20 samples, so a sample whose
        // pressure is below the average sits above zero altitude.
        let mut log = FlightLog::new();
        for i in 0..20 {
            log.append(pressure_sample(101000 + (i % 2) * 100));
        }
        log.compute_altitudes();
        let alt = log.altitude();
        assert!(alt[0] > 0.0); // 101000 Pa is below the 101050 average
        assert!(alt[1] < 0.0);
    }

    #[test]
    fn test_carried_channels() {
        let mut log = FlightLog::new();
        log.append(Sample::SESSION_END);
        log.append(Sample::new(101325, 21.0, 4.1, 0));
        log.append(Sample::SESSION_END);
        log.append(Sample::new(101325, 18.0, 3.9, 0));

        let battery = log.battery_carried();
        let temperature = log.temperature_carried();
        // A leading marker has nothing to carry
        assert_eq!(battery[0], 0.0);
        assert_eq!(temperature[0], 0.0);
        // Markers repeat the last valid reading
        assert_eq!(battery[2], 4.1);
        assert_eq!(temperature[2], 21.0);
        assert_eq!(battery[3], 3.9);
    }

    #[test]
    fn test_presentation_channels() {
        let mut log = FlightLog::new();
        log.append(Sample::new(101325, 21.0, 4.1, 1500));
        log.append(Sample::new(101200, 21.0, 4.1, 0));
        log.compute_altitudes();

        assert_eq!(log.pressure(), vec![101325, 101200]);
        assert_eq!(log.servo(), vec![1500.0, 0.0]);
        let ft = log.altitude_ft();
        assert!((ft[0] - log.altitude()[0] * 3.2808399).abs() < 1e-9);

        let upload = log.to_upload_text(0, 2);
        assert_eq!(
            upload,
            "P: 101325 T: 2100 B: 409 S: 1500\r\nP: 101200 T: 2100 B: 409 S: 0\r\n"
        );
    }

    #[test]
    fn test_session_boundary_indices() {
        let mut log = FlightLog::new();
        log.append(pressure_sample(101325));
        log.append(Sample::SESSION_END);
        log.append(pressure_sample(101325));
        log.append(Sample::SESSION_END);
        assert_eq!(log.session_boundary_indices(), vec![1, 3]);
    }

    #[test]
    fn test_empty_and_all_marker_logs() {
        let mut log = FlightLog::new();
        log.compute_altitudes();
        assert!(log.altitude().is_empty());
        assert!(log.session_boundary_indices().is_empty());

        log.append(Sample::SESSION_END);
        log.append(Sample::SESSION_END);
        log.compute_altitudes();
        assert_eq!(log.altitude(), &[0.0, 0.0]);
    }

    #[test]
    fn test_to_json_has_samples() {
        let mut log = FlightLog::new();
        log.append(pressure_sample(101325));
        log.compute_altitudes();
        let json = log.to_json().unwrap();
        assert!(json.contains("\"samples\""));
        assert!(json.contains("\"altitude_m\""));
        assert!(json.contains("\"log_interval\""));
    }
}
