//! Error types for the conversion engine.

use lanecast_chart::{CodedError, ValidationError};
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested lane count is outside the supported range.
    #[error("invalid lane target: {0}")]
    InvalidLaneTarget(ValidationError),

    /// The beatmap failed validation.
    #[error("beatmap failed validation with {} error(s): {}", errors.len(), summarize(errors))]
    InvalidBeatmap {
        /// Validation errors found in the beatmap.
        errors: Vec<ValidationError>,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CodedError for ConvertError {
    fn code(&self) -> &'static str {
        match self {
            ConvertError::InvalidLaneTarget(_) => "CONVERT_001",
            ConvertError::InvalidBeatmap { .. } => "CONVERT_002",
        }
    }

    fn category(&self) -> &'static str {
        "convert"
    }
}
