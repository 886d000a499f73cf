//! Inter-flight baseline drift correction.
//!
//! Ground-level pressure drifts over a flying session, so later flights in
//! a log appear to start above (or below) zero. The correction subtracts a
//! per-segment constant offset so that every flight's pre-launch baseline
//! sits at exactly zero: each segment between consecutive flights' start
//! indices is shifted by the earlier flight's start height. A smooth
//! interpolation would be possible but has not been needed in practice.
//!
//! Inputs are borrowed and never mutated; the corrected altitude series
//! and the adjusted flight records are fresh copies.

use crate::detector::Flight;

/// Correct the altitude series and flight heights for baseline drift.
///
/// With fewer than two flights there is no drift to correct against, so
/// the inputs are returned unchanged.
pub fn correct_baseline(altitude: &[f64], flights: &[Flight]) -> (Vec<f64>, Vec<Flight>) {
    if flights.len() < 2 {
        return (altitude.to_vec(), flights.to_vec());
    }

    // Per-sample offsets, segmented by the flights' start indices.
    let mut offsets = vec![0.0; altitude.len()];
    let clamp = |i: usize| i.min(altitude.len());

    // Start of the log up to the second flight's start.
    for offset in &mut offsets[..clamp(flights[1].start_index)] {
        *offset = flights[0].start_height;
    }
    // Each segment between consecutive flight starts.
    for pair in flights.windows(2).skip(1) {
        for offset in &mut offsets[clamp(pair[0].start_index)..clamp(pair[1].start_index)] {
            *offset = pair[0].start_height;
        }
    }
    // Start of the last flight to the end of the log.
    let last = &flights[flights.len() - 1];
    for offset in &mut offsets[clamp(last.start_index)..] {
        *offset = last.start_height;
    }

    let corrected = altitude
        .iter()
        .zip(&offsets)
        .map(|(altitude, offset)| altitude - offset)
        .collect();

    // Every flight is re-based so its launch starts at zero height.
    let adjusted = flights
        .iter()
        .map(|flight| {
            let mut flight = *flight;
            flight.launch_height -= flight.start_height;
            flight.launch_window_end_height -= flight.start_height;
            flight.max_height -= flight.start_height;
            flight.start_height = 0.0;
            flight
        })
        .collect();

    (corrected, adjusted)
}

// =============================================================================
// Tests
// =============================================================================
