//! Error Taxonomy - Recoverable vs Fatal
//!
//! `PredictError` covers per-request conditions the caller can report and
//! recover from. `ArtifactError` covers startup failures (missing/corrupt
//! model or encoder files) that must abort initialization.

use std::path::PathBuf;

// ============================================================================
// PREDICTION ERRORS (recoverable)
// ============================================================================

/// Errors raised while assembling, classifying or decoding one observation.
///
/// Every variant carries enough context (column name, offending value) to
/// diagnose without a debugger. None of these are panics.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    /// A schema column has no value in the raw inputs.
    MissingField { column: &'static str },

    /// A categorical value is outside the encoder's trained vocabulary.
    UnseenLabel { column: String, value: String },

    /// The schema references a column the encoder set has no encoder for.
    UnknownColumn { column: String },

    /// Decode of an integer code outside the encoder's class range.
    CodeOutOfRange { column: String, code: u32, limit: usize },

    /// Column order/membership/typing diverges from the trained layout.
    SchemaMismatch(String),

    /// The underlying model failed to run.
    Inference(String),
}

impl std::fmt::Display for PredictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { column } => {
                write!(f, "missing required field '{}'", column)
            }
            Self::UnseenLabel { column, value } => {
                write!(f, "value '{}' for column '{}' is not in the trained vocabulary", value, column)
            }
            Self::UnknownColumn { column } => {
                write!(f, "no encoder registered for column '{}'", column)
            }
            Self::CodeOutOfRange { column, code, limit } => {
                write!(f, "code {} out of range for '{}' ({} known classes)", code, column, limit)
            }
            Self::SchemaMismatch(detail) => {
                write!(f, "schema mismatch: {}", detail)
            }
            Self::Inference(detail) => {
                write!(f, "inference failed: {}", detail)
            }
        }
    }
}

impl std::error::Error for PredictError {}

// ============================================================================
// ARTIFACT ERRORS (fatal at startup)
// ============================================================================

/// Failure to load the model or encoder artifacts.
///
/// These abort context initialization; the process must never serve
/// predictions with partial state.
#[derive(Debug)]
pub enum ArtifactError {
    /// Artifact file could not be read.
    Io { path: PathBuf, source: std::io::Error },

    /// Artifact file is not valid JSON / not the expected shape.
    Parse { path: PathBuf, source: serde_json::Error },

    /// ONNX model could not be loaded into a session.
    Model(String),

    /// Artifacts loaded but are inconsistent with the schema or each other.
    Invalid(PredictError),
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read artifact {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse artifact {}: {}", path.display(), source)
            }
            Self::Model(detail) => write!(f, "failed to load model: {}", detail),
            Self::Invalid(err) => write!(f, "artifact validation failed: {}", err),
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Model(_) => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<PredictError> for ArtifactError {
    fn from(err: PredictError) -> Self {
        Self::Invalid(err)
    }
}

// ============================================================================
// TESTS
// ============================================================================
