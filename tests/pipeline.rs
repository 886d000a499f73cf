//! End-to-end pipeline test: raw samples -> altitude -> launch detection
//! -> baseline correction, over a synthetic two-flight session with
//! ground-pressure drift between the flights.

use altilog_core::{baseline, detector, FlightLog, Sample};

const BASE_PRESSURE: f64 = 101325.0;

/// Inverse of the barometric formula: the pressure that decodes to a
/// given altitude against `BASE_PRESSURE`.
fn pressure_for(height_m: f64) -> i32 {
    (BASE_PRESSURE * (1.0 - height_m / 44330.8).powf(1.0 / 0.190263)).round() as i32
}

fn sample_at(height_m: f64) -> Sample {
    Sample::new(pressure_for(height_m), 20.0, 4.1, 0)
}

/// Two hand launches at 0.5 s per sample. The ground pressure drifts by
/// about 5 m worth between them.
fn build_log() -> FlightLog {
    let mut log = FlightLog::new();

    // Calibration period on the ground: exactly the base pressure, so
    // the first flight's baseline is exactly zero.
    for _ in 0..20 {
        log.append(Sample::new(BASE_PRESSURE as i32, 20.0, 4.1, 0));
    }

    // Flight 1: launch to 30 m, slow glide down.
    for h in [5.0, 10.0, 15.0, 20.0, 25.0, 30.0] {
        log.append(sample_at(h));
    }
    for h in [28.0, 26.0, 24.0, 22.0, 20.0, 18.0, 16.0, 12.0, 7.0] {
        log.append(sample_at(h));
    }

    // Ground period with drifted pressure: apparent altitude ~5 m.
    for _ in 0..22 {
        log.append(sample_at(5.0));
    }

    // Flight 2: launch from the drifted baseline to 35 m.
    for h in [10.0, 15.0, 20.0, 25.0, 30.0, 35.0] {
        log.append(sample_at(h));
    }
    for h in [33.0, 30.0, 26.0, 22.0, 18.0, 14.0, 10.0, 7.0] {
        log.append(sample_at(h));
    }

    log.compute_altitudes();
    log
}

#[test]
fn detects_both_flights_and_corrects_drift() {
    let log = build_log();
    let flights = detector::find_launches(&log);
    assert_eq!(flights.len(), 2);

    // Flight 1 launched off the calibration baseline.
    assert_eq!(flights[0].start_height, 0.0);
    assert!((flights[0].max_height - 30.0).abs() < 0.2);

    // Flight 2's baseline shows the drift.
    assert!((flights[1].start_height - 5.0).abs() < 0.2);
    assert!((flights[1].max_height - 35.0).abs() < 0.2);

    let (corrected, adjusted) = baseline::correct_baseline(log.altitude(), &flights);
    assert_eq!(corrected.len(), log.len());

    // After correction every flight starts at zero and flight 2's peak
    // is measured from its own baseline.
    assert_eq!(adjusted[0].start_height, 0.0);
    assert_eq!(adjusted[1].start_height, 0.0);
    assert!((adjusted[1].max_height - 30.0).abs() < 0.4);

    // The drifted ground segment after flight 2's start sits near zero.
    assert!(corrected[adjusted[1].start_index].abs() < 0.4);

    // Original flights are untouched (copy-on-write).
    assert!((flights[1].start_height - 5.0).abs() < 0.2);
}

#[test]
fn text_round_trip_preserves_analysis() {
    let log = build_log();
    let reloaded = FlightLog::from_text(&log.to_text());

    assert_eq!(reloaded.samples(), log.samples());
    assert_eq!(reloaded.log_interval(), log.log_interval());
    assert_eq!(
        detector::find_launches(&reloaded),
        detector::find_launches(&log)
    );
}

#[test]
fn session_boundary_splits_analysis() {
    // A launch right after a power cycle: calibration restarts, and the
    // seek-back must not reach into the previous session.
    let mut log = FlightLog::new();
    for _ in 0..20 {
        log.append(sample_at(0.0));
    }
    log.append(Sample::SESSION_END);
    for _ in 0..20 {
        log.append(Sample::new(95000, 20.0, 4.1, 0));
    }
    log.compute_altitudes();

    // The second session recalibrates to its own base pressure.
    assert!(log.altitude()[21].abs() < 1e-9);
    assert_eq!(log.session_boundary_indices(), vec![20]);
    assert!(detector::find_launches(&log).is_empty());
}
