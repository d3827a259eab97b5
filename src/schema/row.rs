//! Feature Row - Encoded single-observation vector
//!
//! **Versioned feature row with layout validation**
//!
//! Uses the centralized layout from `layout.rs` for:
//! - Consistent column ordering
//! - Version tracking
//! - Layout hash for compatibility checks
//!
//! A row is built per prediction request, handed to the classifier and
//! discarded. It is never persisted.

use serde::{Deserialize, Serialize};

use super::layout::{layout_hash, validate_layout, FEATURE_COUNT, SCHEMA, SCHEMA_VERSION};
use crate::error::PredictError;

// ============================================================================
// VERSIONED FEATURE ROW
// ============================================================================

/// Versioned feature row with layout metadata
///
/// All model input goes through this struct; never hand the classifier a raw
/// `Vec<f32>` whose provenance is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Schema layout version
    pub version: u8,
    /// CRC32 hash of the schema layout (for mismatch detection)
    pub layout_hash: u32,
    /// Encoded values in the order defined by SCHEMA
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureRow {
    /// Create a zeroed row with the current version
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Create from encoded values with the current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: SCHEMA_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Get value by positional index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Get value by column name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::column_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this row matches the current layout
    pub fn validate(&self) -> Result<(), PredictError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Check if this row is compatible with the current layout
    pub fn is_compatible(&self) -> bool {
        self.validate().is_ok()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "schema_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": SCHEMA.iter()
                .zip(self.values.iter())
                .map(|(col, value)| (col.name.to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

impl Default for FeatureRow {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f32; FEATURE_COUNT]> for FeatureRow {
    fn from(values: [f32; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// TESTS
// ============================================================================
