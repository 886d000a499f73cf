//! Log record codecs.
//!
//! This module contains wire format decoding and text formatting for the
//! logger's record formats. All functions are pure (no I/O).
//!
//! # Structure
//!
//! - **Binary decoding** - fixed-size records in one of three historical
//!   wire formats, selected by [`RecordFormat`]
//! - **Binary encoding** - latest (V1) format only, used when re-writing
//!   a selection back to a device image
//! - **Text formatting** - the human-readable `P: .. T: .. B: .. S: ..`
//!   log line format, plus the write-only scaled "upload" encoding
//!
//! # Example
//!
//! ```rust
//! use altilog_core::codec::{self, RecordFormat};
//!
//! // A V1 record: pressure 101325 Pa, 22.5 C, 4.0 V, no servo pulse
//! let bytes = [0x00, 0x00, 150, 40, 0];
//! let sample = codec::decode(&bytes, 0, RecordFormat::V1).unwrap();
//! assert_eq!(sample.pressure, 101325);
//! assert_eq!(codec::format_line(&sample), "P: 101325 T: 22.5 B: 4 S: 0");
//! ```

pub mod binary;
pub mod text;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::sample::Sample;

pub use binary::encode;
pub use text::{format_line, format_upload_line, parse_line};

/// Binary record format identifier.
///
/// Loggers in the field have used three record layouts over the years; a
/// downloaded memory image is decoded with the format matching the
/// firmware that wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordFormat {
    /// Three raw little-endian 32-bit fields (pressure, temperature, battery)
    LegacyA,
    /// A packed 32-bit word plus a signed servo byte
    LegacyB,
    /// The current 5-byte format: i16 pressure offset, three u8 channels
    V1,
}

impl RecordFormat {
    /// Record size in bytes for this format.
    pub fn size(&self) -> usize {
        match self {
            RecordFormat::LegacyA => 12,
            RecordFormat::LegacyB => 5,
            RecordFormat::V1 => 5,
        }
    }
}

/// Decode one record starting at `offset` in `data`.
///
/// Returns [`DecodeError::TooShort`] if the record would overrun the
/// buffer; garbage is never silently decoded.
pub fn decode(data: &[u8], offset: usize, format: RecordFormat) -> Result<Sample, DecodeError> {
    let size = format.size();
    if data.len() < offset + size {
        return Err(DecodeError::TooShort {
            expected: offset + size,
            actual: data.len(),
        });
    }
    let record = &data[offset..offset + size];
    match format {
        RecordFormat::LegacyA => binary::decode_legacy_a(record),
        RecordFormat::LegacyB => binary::decode_legacy_b(record),
        RecordFormat::V1 => binary::decode_v1(record),
    }
}
