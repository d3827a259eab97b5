//! Encoder Set - All fitted encoders for one model artifact
//!
//! Loads the JSON export of the fitted per-column label encoders plus the
//! target encoder, and serves them read-only for the process lifetime.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::label::CategoryEncoder;
use crate::error::{ArtifactError, PredictError};

// ============================================================================
// ARTIFACT FORMAT
// ============================================================================

/// On-disk shape of the encoders artifact (`encoders.json`).
///
/// Produced by the training side when exporting the fitted encoders; this
/// crate only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodersArtifact {
    /// Artifact format version
    pub version: u8,
    /// Per-column class lists, code = position
    pub columns: HashMap<String, ClassList>,
    /// Class list of the prediction target
    pub target: ClassList,
}

/// Fitted class list for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassList {
    pub classes: Vec<String>,
}

/// Supported artifact format version
pub const ENCODERS_ARTIFACT_VERSION: u8 = 1;

// ============================================================================
// ENCODER SET
// ============================================================================

/// Column name -> fitted encoder, plus the target encoder.
///
/// Immutable after load; safe to share across requests without locking.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    columns: HashMap<String, CategoryEncoder>,
    target: CategoryEncoder,
}

impl EncoderSet {
    /// Build the set from a parsed artifact.
    pub fn from_artifact(artifact: EncodersArtifact) -> Result<Self, PredictError> {
        if artifact.version != ENCODERS_ARTIFACT_VERSION {
            return Err(PredictError::SchemaMismatch(format!(
                "unsupported encoders artifact version {} (expected {})",
                artifact.version, ENCODERS_ARTIFACT_VERSION
            )));
        }

        let mut columns = HashMap::with_capacity(artifact.columns.len());
        for (name, list) in artifact.columns {
            let encoder = CategoryEncoder::from_classes(&name, list.classes)?;
            columns.insert(name, encoder);
        }

        let target = CategoryEncoder::from_classes("target", artifact.target.classes)?;
        if target.is_empty() {
            return Err(PredictError::SchemaMismatch(
                "target encoder has no classes".to_string(),
            ));
        }

        Ok(Self { columns, target })
    }

    /// Load and parse the encoders artifact from disk.
    ///
    /// Any failure here is fatal: a prediction context must never come up
    /// with a partial encoder set.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        log::info!("Loading encoders artifact from: {}", path.display());

        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact: EncodersArtifact =
            serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let set = Self::from_artifact(artifact)?;
        log::info!(
            "Encoders loaded: {} columns, {} target classes",
            set.columns.len(),
            set.target.len()
        );

        Ok(set)
    }

    /// Get the fitted encoder for a column
    pub fn get(&self, column: &str) -> Result<&CategoryEncoder, PredictError> {
        self.columns
            .get(column)
            .ok_or_else(|| PredictError::UnknownColumn {
                column: column.to_string(),
            })
    }

    /// Whether a column has a registered encoder
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// The target (output class) encoder
    pub fn target(&self) -> &CategoryEncoder {
        &self.target
    }

    /// Names of all columns with a registered encoder
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
