//! # Altilog Core
//!
//! Platform-independent flight log decoding and DLG launch analysis for
//! barometric altimeters.
//!
//! This crate contains pure decoding and analysis logic with **zero I/O
//! dependencies**: it is handed byte buffers or text by a transport layer
//! and produces arrays and flight records for a presentation layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  altilog-core (platform-independent, no I/O)                │
//! │  ├── codec/       (binary record + text line formats)      │
//! │  ├── flight_log   (samples, calibration, altitude series)  │
//! │  ├── detector     (DLG launch detection state machine)     │
//! │  ├── baseline     (inter-flight drift correction)          │
//! │  └── atmosphere   (pressure -> altitude conversion)        │
//! └─────────────────────────────────────────────────────────────┘
//!         ▲                                   │
//!    ┌────┴─────────┐                 ┌───────▼────────┐
//!    │ serial       │                 │ charts, stats  │
//!    │ transport    │                 │ (presentation) │
//!    └──────────────┘                 └────────────────┘
//! ```
//!
//! Data flows one way: raw bytes or text become a [`FlightLog`], the
//! [`detector`] finds the individual flights in its altitude series, and
//! the [`baseline`] corrector removes inter-flight pressure drift. The
//! detector and corrector must run in that order on a given series;
//! independent logs can be analysed in parallel since nothing here holds
//! shared mutable state.
//!
//! ## Example: Decoding a Memory Image
//!
//! ```rust
//! use altilog_core::codec::RecordFormat;
//! use altilog_core::FlightLog;
//!
//! // Two V1 records: one reading, one erased (session boundary)
//! let image = [0x00, 0x00, 100, 42, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
//! let log = FlightLog::from_bytes(&image, RecordFormat::V1).unwrap();
//! assert_eq!(log.samples()[0].pressure, 101325);
//! assert_eq!(log.session_boundary_indices(), vec![1]);
//! ```
//!
//! ## Example: Finding Launches
//!
//! ```rust
//! use altilog_core::LaunchDetector;
//!
//! let altitude = [0.0, 5.0, 10.0, 15.0, 20.0, 2.0];
//! let mut detector = LaunchDetector::new(0.5);
//! for index in 0..altitude.len() {
//!     detector.step(&altitude, index);
//! }
//! let flights = detector.finish();
//! assert_eq!(flights.len(), 1);
//! assert_eq!(flights[0].max_height, 20.0);
//! ```
//!
//! Or, for the common whole-log case, [`detector::find_launches`]
//! followed by [`baseline::correct_baseline`].

pub mod atmosphere;
pub mod baseline;
pub mod codec;
pub mod detector;
pub mod error;
pub mod flight_log;
pub mod sample;

// Re-export commonly used types
pub use baseline::correct_baseline;
pub use codec::RecordFormat;
pub use detector::{find_launches, DetectorParams, DetectorState, Flight, LaunchDetector};
pub use error::DecodeError;
pub use flight_log::{FlightLog, DEFAULT_LOG_INTERVAL};
pub use sample::{Sample, PRESSURE_EMPTY_DATA};
