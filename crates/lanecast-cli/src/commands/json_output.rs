//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json` and then prints exactly one of the
//! documents below to stdout.

use lanecast_chart::{BeatmapStatistics, CodedError, ValidationError, ValidationWarning};
use lanecast_convert::{ConversionParams, ConversionSummary, ConvertError};
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// Validation and engine errors pass through with their own codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Unknown file extension
    pub const UNKNOWN_EXTENSION: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Output could not be written
    pub const FILE_WRITE: &str = "CLI_004";
    /// Repeated conversions disagreed
    pub const NONDETERMINISTIC: &str = "CLI_005";
    /// Output hash differs from the expected one
    pub const HASH_MISMATCH: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E001", "CONVERT_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the JSON path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }
}

/// JSON output for the `convert` command.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutput {
    /// Whether the conversion succeeded
    pub success: bool,
    /// Errors that stopped the conversion
    pub errors: Vec<JsonError>,
    /// Validation warnings
    pub warnings: Vec<JsonWarning>,
    /// BLAKE3 hash of the input file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    /// Conversion summary (if converted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ConversionSummary>,
    /// BLAKE3 hash of the converted notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_hash: Option<String>,
    /// Where the converted beatmap was written, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ConvertOutput {
    /// Creates a successful convert output.
    pub fn success(
        source_hash: String,
        summary: ConversionSummary,
        notes_hash: String,
        output: Option<String>,
        warnings: Vec<JsonWarning>,
    ) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            source_hash: Some(source_hash),
            summary: Some(summary),
            notes_hash: Some(notes_hash),
            output,
        }
    }

    /// Creates a failed convert output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>, source_hash: Option<String>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            source_hash,
            summary: None,
            notes_hash: None,
            output: None,
        }
    }
}

/// JSON output for the `inspect` command.
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutput {
    /// Whether the beatmap is convertible
    pub success: bool,
    /// Validation or load errors
    pub errors: Vec<JsonError>,
    /// Validation warnings
    pub warnings: Vec<JsonWarning>,
    /// BLAKE3 hash of the input file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    /// Lane layout of the beatmap ("single_column" or "multi_lane")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Object statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<BeatmapStatistics>,
    /// Parameters an automatic conversion would use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ConversionParams>,
}

/// JSON output for the `verify` command.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOutput {
    /// Whether every run agreed (and matched the expected hash)
    pub success: bool,
    /// Load, conversion or verification errors
    pub errors: Vec<JsonError>,
    /// Number of conversions compared
    pub runs: u32,
    /// Hash of every run, in order
    pub hashes: Vec<String>,
    /// Hash the runs were checked against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_hash: Option<String>,
}

/// Converts an input error to a JSON error.
pub fn input_error_to_json(err: &InputError, file: Option<&str>) -> JsonError {
    let code = match err {
        InputError::FileRead { .. } => error_codes::FILE_READ,
        InputError::UnknownExtension { .. } => error_codes::UNKNOWN_EXTENSION,
        InputError::JsonParse { .. } => error_codes::JSON_PARSE,
    };
    let error = JsonError::new(code, err.to_string());
    match file {
        Some(f) => error.with_file(f),
        None => error,
    }
}

/// Converts a validation error to a JSON error.
pub fn validation_error_to_json(err: &ValidationError) -> JsonError {
    let error = JsonError::new(err.code.code(), err.message.clone());
    match &err.path {
        Some(path) => error.with_path(path.clone()),
        None => error,
    }
}

/// Converts a validation warning to a JSON warning.
pub fn validation_warning_to_json(warning: &ValidationWarning) -> JsonWarning {
    JsonWarning {
        code: warning.code.code().to_string(),
        message: warning.message.clone(),
        path: warning.path.clone(),
    }
}

/// Expands an engine error into its underlying validation errors when it
/// carries any.
pub fn convert_error_to_json(err: &ConvertError) -> Vec<JsonError> {
    match err {
        ConvertError::InvalidLaneTarget(inner) => vec![validation_error_to_json(inner)],
        ConvertError::InvalidBeatmap { errors } if !errors.is_empty() => {
            errors.iter().map(validation_error_to_json).collect()
        }
        other => vec![JsonError::new(other.code(), other.to_string())],
    }
}
