//! JSON output types for machine-readable CLI output (`--json`).

use serde::Serialize;
use sfconv_backend_mod::ConversionReport;

/// Error codes for conversion failures.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Input file could not be opened or read
    pub const INPUT_READ: &str = "SFC_001";
    /// Output file could not be created, written or tagged
    pub const OUTPUT_WRITE: &str = "SFC_002";
    /// Source track is malformed
    pub const TRACK_FORMAT: &str = "SFC_003";
    /// Sample data file could not be read
    pub const SAMPLE_DATA: &str = "SFC_004";
    /// Song does not fit the module format
    pub const MODULE_LIMIT: &str = "SFC_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "SFC_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Outcome for one converted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutput {
    /// Input path, or `None` for stdin
    pub input: Option<String>,
    pub output: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ConversionReport>,
}

/// JSON output for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutput {
    /// Whether every file converted
    pub success: bool,
    pub files: Vec<FileOutput>,
}

impl ConvertOutput {
    pub fn new(files: Vec<FileOutput>) -> Self {
        Self {
            success: files.iter().all(|f| f.success),
            files,
        }
    }
}
