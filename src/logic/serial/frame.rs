//! Inbound frame parsing: `DATA,<field>,...,<absorbance>`

use thiserror::Error;

use crate::constants::{FRAME_DELIMITER, FRAME_MARKER};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("line does not start with {}", FRAME_MARKER)]
    MissingMarker,

    #[error("frame has no payload")]
    EmptyPayload,

    #[error("could not convert '{0}' to a number")]
    InvalidNumber(String),

    #[error("absorbance '{0}' is not finite")]
    NonFinite(String),
}

impl FrameError {
    /// Lines without the marker are noise on the link, not failed samples
    pub fn is_noise(&self) -> bool {
        matches!(self, Self::MissingMarker)
    }
}

/// A validated sensor frame
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFrame {
    /// Payload fields after the marker
    pub fields: Vec<String>,
    /// Absolute value of the last field
    pub absorbance: f64,
}

/// Decode raw bytes, dropping invalid UTF-8 sequences, and strip
/// surrounding whitespace
pub fn decode_line(bytes: &[u8]) -> String {
    let decoded: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    decoded.trim().to_string()
}

/// Parse a decoded line. The absorbance is always the last field, taken as
/// an absolute value.
pub fn parse_frame(line: &str) -> Result<SensorFrame, FrameError> {
    let line = line.trim();
    if !line.starts_with(FRAME_MARKER) {
        return Err(FrameError::MissingMarker);
    }

    let fields: Vec<String> = line
        .split(FRAME_DELIMITER)
        .skip(1)
        .map(str::to_string)
        .collect();

    let last = fields.last().ok_or(FrameError::EmptyPayload)?;
    let token = last.trim();
    let value: f64 = token
        .parse()
        .map_err(|_| FrameError::InvalidNumber(token.to_string()))?;
    if !value.is_finite() {
        return Err(FrameError::NonFinite(token.to_string()));
    }

    Ok(SensorFrame {
        absorbance: value.abs(),
        fields,
    })
}
