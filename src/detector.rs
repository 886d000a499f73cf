//! DLG launch detection state machine.
//!
//! A discus-launched glider shows up in the altitude series as a short,
//! very fast climb. The detector is a direct behavioural port of the
//! algorithm that runs in real time on the logger firmware: a single
//! forward pass, one sample per step, with a small amount of look-back.
//!
//! # States
//!
//! ```text
//! ┌─────────┐  sustained climb over threshold   ┌───────────┐
//! │  Armed  │ ────────────────────────────────► │ InFlight  │
//! │         │ ◄──────────────────────────────── │           │
//! └─────────┘  altitude below rearm height      └───────────┘
//!              (flight emitted)
//! ```
//!
//! On launch the detector seeks back through the recent samples for the
//! lowest point (the pre-launch baseline) and opens a fixed-duration
//! launch window in which the peak climb height is tracked separately
//! from the flight's overall maximum.
//!
//! Each log gets a fresh detector instance; there is no state shared
//! across runs, so independent logs can be analysed in parallel.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::flight_log::FlightLog;

// =============================================================================
// Parameters
// =============================================================================

/// Tunable launch detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Climb rate that counts towards a launch, in m/s
    pub climb_threshold_m_per_s: f64,
    /// How long the climb rate must be sustained to declare a launch, ms
    pub climb_time_ms: u32,
    /// How many samples to seek back for the pre-launch minimum
    pub seekback_samples: usize,
    /// Length of the post-launch window in which peak height is tracked, ms
    pub launch_window_ms: u32,
    /// Height below which the detector re-arms, in metres
    pub rearm_height_m: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        DetectorParams {
            climb_threshold_m_per_s: 3.0,
            climb_time_ms: 1500,
            seekback_samples: 20,
            launch_window_ms: 5000,
            rearm_height_m: 8.0,
        }
    }
}

// =============================================================================
// Flight record
// =============================================================================

/// One detected DLG flight.
///
/// All indices are sample indices into the altitude series the flight was
/// detected in; convert to time by multiplying with the log interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Index of the pre-launch baseline (lowest point before the climb)
    pub start_index: usize,
    /// Altitude of the pre-launch baseline
    pub start_height: f64,
    /// Index of the peak height within the launch window
    pub launch_index: usize,
    /// Peak height within the launch window
    pub launch_height: f64,
    /// Index of the overall maximum height of the flight
    pub max_index: usize,
    /// Overall maximum height of the flight
    pub max_height: f64,
    /// Altitude recorded exactly when the launch window closed
    pub launch_window_end_height: f64,
}

// =============================================================================
// Detector
// =============================================================================

/// Detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Watching for a launch
    Armed,
    /// Launch detected, watching for the rearm height
    InFlight,
}

/// Streaming launch detector.
///
/// Feed altitude samples in index order via [`LaunchDetector::step`],
/// then call [`LaunchDetector::finish`] to flush a still-in-progress
/// flight and take the results. [`find_launches`] wraps the whole pass
/// for the common case.
#[derive(Debug, Clone)]
pub struct LaunchDetector {
    params: DetectorParams,
    log_interval: f64,
    /// Sorted session boundary indices. The altitude of a boundary sample
    /// is plain zero, so the seek-back needs these spelled out to avoid
    /// reading baseline candidates from a previous session.
    boundaries: Vec<usize>,

    state: DetectorState,
    climb_count: u32,
    last_height: f64,
    window_count: u32,

    start_index: usize,
    start_height: f64,
    launch_index: usize,
    launch_height: f64,
    max_index: usize,
    max_height: f64,
    launch_window_end_height: f64,

    flights: Vec<Flight>,
}

impl LaunchDetector {
    /// Create a detector with default parameters for a given sample
    /// interval in seconds.
    pub fn new(log_interval: f64) -> Self {
        Self::with_params(DetectorParams::default(), log_interval)
    }

    /// Create a detector with explicit parameters.
    pub fn with_params(params: DetectorParams, log_interval: f64) -> Self {
        LaunchDetector {
            params,
            log_interval,
            boundaries: Vec::new(),
            state: DetectorState::Armed,
            climb_count: 0,
            last_height: 0.0,
            window_count: 0,
            start_index: 0,
            start_height: 0.0,
            launch_index: 0,
            launch_height: 0.0,
            max_index: 0,
            max_height: 0.0,
            launch_window_end_height: 0.0,
            flights: Vec::new(),
        }
    }

    /// Supply the session boundary indices of the log being analysed
    /// (from [`FlightLog::session_boundary_indices`]). Must be sorted.
    pub fn with_boundaries(mut self, boundaries: Vec<usize>) -> Self {
        self.boundaries = boundaries;
        self
    }

    /// Current detector state.
    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Flights completed so far.
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Number of consecutive climbing intervals needed to declare a launch.
    fn climb_trigger_count(&self) -> f64 {
        self.params.climb_time_ms as f64 / (self.log_interval * 1000.0)
    }

    /// Process the sample at `index`. Samples must be fed in order; the
    /// slice is needed for the seek-back at launch time.
    pub fn step(&mut self, altitude: &[f64], index: usize) {
        let height = altitude[index];

        match self.state {
            DetectorState::Armed => {
                if height - self.last_height
                    > self.params.climb_threshold_m_per_s * self.log_interval
                {
                    self.climb_count += 1;
                } else {
                    self.climb_count = 0;
                }
                self.last_height = height;
                if self.climb_count as f64 >= self.climb_trigger_count() {
                    self.declare_launch(altitude, index);
                }
            }
            DetectorState::InFlight => {
                if height > self.max_height {
                    self.max_height = height;
                    self.max_index = index;
                }
                if height < self.params.rearm_height_m {
                    self.emit_flight();
                    self.state = DetectorState::Armed;
                }
            }
        }

        // Launch window bookkeeping runs regardless of state: the window
        // is timed from the launch sample and can outlive an early rearm.
        if self.window_count > 0 {
            if height > self.launch_height {
                self.launch_height = height;
                self.launch_index = index;
            }
            if self.window_count == 1 {
                self.launch_window_end_height = height;
            }
            self.window_count -= 1;
        }
    }

    /// End of data: flush a still-in-progress flight and return all
    /// detected flights.
    pub fn finish(mut self) -> Vec<Flight> {
        if self.state == DetectorState::InFlight {
            debug!("end of data while in flight, flushing final flight");
            self.emit_flight();
        }
        self.flights
    }

    fn declare_launch(&mut self, altitude: &[f64], index: usize) {
        self.state = DetectorState::InFlight;
        self.climb_count = 0;

        // Seek back for the lowest point before the climb. Stop at a
        // session boundary: samples before it were calibrated against a
        // different base pressure.
        self.start_index = index;
        self.start_height = altitude[index];
        let window_start = index.saturating_sub(self.params.seekback_samples);
        for j in (window_start..index).rev() {
            if self.boundaries.binary_search(&j).is_ok() {
                break;
            }
            if altitude[j] <= self.start_height {
                self.start_height = altitude[j];
                self.start_index = j;
            }
        }

        // Open the launch window and restart the maxima from here.
        self.window_count = (self.params.launch_window_ms as f64
            / (self.log_interval * 1000.0)) as u32
            + 1;
        self.max_height = altitude[index];
        self.max_index = index;
        self.launch_height = altitude[index];
        self.launch_index = index;
        self.launch_window_end_height = 0.0;

        debug!(
            "launch detected at sample {index}, baseline {:.1} m at sample {}",
            self.start_height, self.start_index
        );
    }

    fn emit_flight(&mut self) {
        let flight = Flight {
            start_index: self.start_index,
            start_height: self.start_height,
            launch_index: self.launch_index,
            launch_height: self.launch_height,
            max_index: self.max_index,
            max_height: self.max_height,
            launch_window_end_height: self.launch_window_end_height,
        };
        debug!(
            "flight complete: launch {:.1} m, max {:.1} m",
            flight.launch_height, flight.max_height
        );
        self.flights.push(flight);
    }
}

/// Run a full detection pass over a flight log.
pub fn find_launches(log: &FlightLog) -> Vec<Flight> {
    let mut detector =
        LaunchDetector::new(log.log_interval()).with_boundaries(log.session_boundary_indices());
    let altitude = log.altitude();
    for index in 0..altitude.len() {
        detector.step(altitude, index);
    }
    detector.finish()
}

// =============================================================================
// Tests
// =============================================================================
